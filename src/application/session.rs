use super::checkout::CheckoutUrlBuilder;
use crate::domain::amount::{AmountBuffer, Digit};
use crate::error::{CheckoutError, Result};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

/// What the checkout area of the screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutView {
    /// "Enter an amount". Shown for a zero amount and after a failed build.
    Placeholder,
    Loading,
    Ready(Url),
}

/// A pending build, tagged with the amount that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTicket {
    pub amount: String,
}

/// One key press on the amount screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadCommand {
    Preset(u64),
    Digit(Digit),
    Delete,
}

impl FromStr for KeypadCommand {
    type Err = CheckoutError;

    /// Accepts `0`..`9`, `del`/`delete`/`backspace`, `preset <n>` and `$<n>`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || CheckoutError::InvalidCommand(s.to_string());

        match s.to_ascii_lowercase().as_str() {
            "del" | "delete" | "backspace" => return Ok(Self::Delete),
            _ => {}
        }

        let preset = s
            .strip_prefix('$')
            .or_else(|| s.strip_prefix("preset").map(str::trim_start));
        if let Some(value) = preset {
            return match value.parse::<u64>() {
                Ok(value) if value > 0 => Ok(Self::Preset(value)),
                _ => Err(invalid()),
            };
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Digit::try_from(c).map(Self::Digit),
            _ => Err(invalid()),
        }
    }
}

/// State of the amount screen: the buffer plus what the checkout area shows.
///
/// Builds run elsewhere. Every edit hands back a ticket naming the amount to build
/// for, and results come back through [`CheckoutSession::accept`], which drops any
/// result whose amount is no longer on screen.
#[derive(Debug)]
pub struct CheckoutSession {
    buffer: AmountBuffer,
    view: CheckoutView,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new(AmountBuffer::default())
    }
}

impl CheckoutSession {
    /// Starts in `Placeholder`; call [`CheckoutSession::refresh`] for the first ticket.
    pub fn new(buffer: AmountBuffer) -> Self {
        Self {
            buffer,
            view: CheckoutView::Placeholder,
        }
    }

    pub fn amount(&self) -> &AmountBuffer {
        &self.buffer
    }

    pub fn view(&self) -> &CheckoutView {
        &self.view
    }

    pub fn apply(&mut self, command: KeypadCommand) -> Option<CheckoutTicket> {
        match command {
            KeypadCommand::Preset(value) => self.buffer.select_preset(value),
            KeypadCommand::Digit(digit) => self.buffer.press_digit(digit),
            KeypadCommand::Delete => self.buffer.press_delete(),
        }
        self.refresh()
    }

    /// Issues a ticket for the current amount, or shows the placeholder if
    /// there is nothing to build.
    pub fn refresh(&mut self) -> Option<CheckoutTicket> {
        if self.buffer.is_ready() {
            self.view = CheckoutView::Loading;
            Some(CheckoutTicket {
                amount: self.buffer.as_str().to_string(),
            })
        } else {
            self.view = CheckoutView::Placeholder;
            None
        }
    }

    /// Applies a build result. Returns `false` if it was stale and dropped.
    pub fn accept(&mut self, ticket: &CheckoutTicket, result: Result<Option<Url>>) -> bool {
        if ticket.amount != self.buffer.as_str() {
            debug!(
                stale = %ticket.amount,
                current = %self.buffer.as_str(),
                "discarding superseded checkout url"
            );
            return false;
        }

        self.view = match result {
            Ok(Some(url)) => CheckoutView::Ready(url),
            Ok(None) => CheckoutView::Placeholder,
            Err(e) => {
                warn!(amount = %ticket.amount, error = %e, "checkout url unavailable");
                CheckoutView::Placeholder
            }
        };
        true
    }
}

type BuildOutcome = (CheckoutTicket, Result<Option<Url>>);

/// Drives a [`CheckoutSession`] with one tokio task per build.
///
/// Tasks report back through a channel, so results are applied one at a time in
/// the order they finish.
pub struct KeypadController {
    session: CheckoutSession,
    builder: Arc<CheckoutUrlBuilder>,
    tx: mpsc::UnboundedSender<BuildOutcome>,
    rx: mpsc::UnboundedReceiver<BuildOutcome>,
    in_flight: usize,
}

impl KeypadController {
    /// Creates a controller and starts the build for the initial amount.
    pub fn new(builder: Arc<CheckoutUrlBuilder>, buffer: AmountBuffer) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            session: CheckoutSession::new(buffer),
            builder,
            tx,
            rx,
            in_flight: 0,
        };
        if let Some(ticket) = controller.session.refresh() {
            controller.spawn_build(ticket);
        }
        controller
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn apply(&mut self, command: KeypadCommand) {
        if let Some(ticket) = self.session.apply(command) {
            self.spawn_build(ticket);
        }
    }

    /// Applies results that are already available without waiting.
    pub fn poll(&mut self) {
        while let Ok((ticket, result)) = self.rx.try_recv() {
            self.in_flight -= 1;
            self.session.accept(&ticket, result);
        }
    }

    /// Waits for every outstanding build and returns the resulting view.
    pub async fn settle(&mut self) -> &CheckoutView {
        while self.in_flight > 0 {
            // The controller holds a sender, so the channel never closes here.
            let Some((ticket, result)) = self.rx.recv().await else {
                break;
            };
            self.in_flight -= 1;
            self.session.accept(&ticket, result);
        }
        self.session.view()
    }

    fn spawn_build(&mut self, ticket: CheckoutTicket) {
        let builder = Arc::clone(&self.builder);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = builder.build(&ticket.amount).await;
            // Receiver gone means the controller was dropped; nobody wants the result.
            let _ = tx.send((ticket, result));
        });
    }
}
