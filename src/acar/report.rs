//! Battle reporting
//!
//! The report is an output artifact: an ordered list of human-readable
//! lines, written incrementally as phases execute and closed with a marker
//! when the terminal phase completes. Tracing output is diagnostics only.

/// Closing marker appended when the report is finalized
pub const CLOSING_MARKER: &str = "--- battle resolution complete ---";

/// Sink for human-readable battle report lines
pub trait Reporter {
    fn report(&mut self, line: String);

    /// Close the report and hand back the accumulated lines
    fn finalize(&mut self) -> Vec<String>;
}

/// Default reporter: buffers lines and echoes them through tracing
#[derive(Debug, Default)]
pub struct BattleReport {
    lines: Vec<String>,
}

impl BattleReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Reporter for BattleReport {
    fn report(&mut self, line: String) {
        tracing::info!(target: "autoresolve::report", "{line}");
        self.lines.push(line);
    }

    fn finalize(&mut self) -> Vec<String> {
        self.report(CLOSING_MARKER.to_string());
        std::mem::take(&mut self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_accumulates_in_order() {
        let mut report = BattleReport::new();
        report.report("first".to_string());
        report.report("second".to_string());
        assert_eq!(report.lines(), ["first", "second"]);
    }

    #[test]
    fn test_finalize_appends_closing_marker() {
        let mut report = BattleReport::new();
        report.report("battle line".to_string());
        let lines = report.finalize();
        assert_eq!(lines.last().map(String::as_str), Some(CLOSING_MARKER));
        assert_eq!(lines.len(), 2);
    }
}
