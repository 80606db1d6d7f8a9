use std::fmt;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Log line layout, one bracket per field:
/// `[TIMESTAMP] [LEVEL] [SCOPE] [TARGET: FILE:LINE]: MESSAGE`
///
/// `SCOPE` is the innermost span, or the last segment of the target when the
/// event fires outside any span.
#[derive(Debug, Clone, Copy)]
pub struct BracketedFormatter {
    with_location: bool,
}

impl BracketedFormatter {
    /// Full layout, including source file and line
    pub fn verbose() -> Self {
        Self { with_location: true }
    }

    /// Drops the `[TARGET: FILE:LINE]` bracket, for terminal output
    pub fn compact() -> Self {
        Self {
            with_location: false,
        }
    }
}

impl Default for BracketedFormatter {
    fn default() -> Self {
        Self::verbose()
    }
}

fn target_tail<'a>(metadata: &Metadata<'a>) -> &'a str {
    metadata.target().rsplit("::").next().unwrap_or("unknown")
}

impl<S, N> FormatEvent<S, N> for BracketedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z");
        let scope = ctx
            .event_scope()
            .and_then(|scope| scope.from_root().last().map(|span| span.name()))
            .unwrap_or_else(|| target_tail(metadata));

        write!(writer, "[{}]  [{:5}] [{}] ", timestamp, metadata.level(), scope)?;

        if self.with_location {
            write!(writer, "[{}", metadata.target())?;
            if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
                write!(writer, ": {}:{}", file, line)?;
            }
            write!(writer, "]: ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn log_with(formatter: BracketedFormatter) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(formatter)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("partition");
            let _guard = span.enter();
            tracing::warn!("moved {} pairs", 3);
        });
        captured.text()
    }

    #[test]
    fn test_verbose_line_has_scope_and_location() {
        let line = log_with(BracketedFormatter::verbose());

        assert!(line.contains("[WARN ] [partition] ["), "{line}");
        assert!(line.contains("formatter.rs:"), "{line}");
        assert!(line.trim_end().ends_with("]: moved 3 pairs"), "{line}");
    }

    #[test]
    fn test_compact_line_skips_location() {
        let line = log_with(BracketedFormatter::compact());

        assert!(line.contains("[WARN ] [partition] moved 3 pairs"), "{line}");
        assert!(!line.contains("formatter.rs"), "{line}");
    }
}
