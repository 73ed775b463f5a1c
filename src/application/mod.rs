//! Application layer: turning keypad edits into checkout URLs.
//!
//! `CheckoutUrlBuilder` creates one order per amount and serializes the hosted
//! checkout URL. `CheckoutSession` keeps the screen state and drops results for
//! amounts that are no longer shown, while `KeypadController` runs the builds as
//! `tokio` tasks reporting back over a channel.

pub mod checkout;
pub mod session;
