use crate::application::checkout::{HaltReason, RunFailure, RunReporter};
use crate::domain::capture::CaptureResult;
use crate::domain::order::OrderResult;
use std::io::{self, Write};

/// Renders a checkout run for the operator.
///
/// Progress goes to `out`; halts and failures go to `err`. Wraps any pair of
/// `Write` sinks, usually locked stdout and stderr.
pub struct ConsoleReport<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> ConsoleReport<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> RunReporter for ConsoleReport<O, E> {
    fn order_created(&mut self, order: &OrderResult) -> io::Result<()> {
        writeln!(self.out, "Order ID: {}", order.id.as_deref().unwrap_or_default())
    }

    fn approval_required(&mut self, approval_link: &str) -> io::Result<()> {
        writeln!(self.out, "\nPlease approve the order by visiting this URL:")?;
        writeln!(self.out, "{approval_link}")
    }

    fn awaiting_approval(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "\nPress Enter after you have approved the order in your browser..."
        )?;
        self.out.flush()
    }

    fn order_captured(&mut self, capture: &CaptureResult) -> io::Result<()> {
        writeln!(self.out, "\nOrder captured successfully!")?;
        writeln!(
            self.out,
            "Status: {}",
            capture.status.as_deref().unwrap_or_default()
        )?;

        let Some(details) = capture.first_capture().filter(|details| !details.is_empty()) else {
            return writeln!(self.out, "Capture details not found in response.");
        };
        if let Some(id) = &details.id {
            writeln!(self.out, "Capture ID: {id}")?;
        }
        if let Some(amount) = details.amount.as_ref().filter(|amount| !amount.is_empty()) {
            writeln!(self.out, "Amount: {amount}")?;
        }
        if let Some(status) = &details.status {
            writeln!(self.out, "Capture Status: {status}")?;
        }
        Ok(())
    }

    fn halted(&mut self, reason: HaltReason) -> io::Result<()> {
        self.out.flush()?;
        writeln!(self.err, "{reason}")
    }

    fn failed(&mut self, failure: &RunFailure) -> io::Result<()> {
        self.out.flush()?;
        match failure {
            RunFailure::Provider(err) => writeln!(self.err, "API Error: {}", err.payload),
            RunFailure::Unexpected(message) => writeln!(self.err, "Unexpected Error: {message}"),
        }
    }
}
