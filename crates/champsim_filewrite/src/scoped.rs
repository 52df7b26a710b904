//! Scoped generation: collect fragments in a closure, then flush exactly once.

use champsim_config::{FlushPolicy, WriterOptions};
use tracing::warn;

use crate::error::FileWriteError;
use crate::fragment::FragmentSet;
use crate::generate::FileWriter;
use crate::writer::FlushReport;

/// Runs `generate` against a fresh writer and flushes what it collected.
///
/// The closure receives the writer and the fragment set to extend. What
/// happens when it fails depends on the options' [`FlushPolicy`]:
///
/// - [`FlushPolicy::Always`]: fragments collected before the failure are
///   still flushed, then the closure's error is returned. If that flush fails
///   too, the flush error is logged and the closure's error wins.
/// - [`FlushPolicy::OnSuccess`]: nothing is written and the closure's error
///   is returned.
pub fn with_writer<T, F>(
    options: WriterOptions,
    generate: F,
) -> Result<(T, FlushReport), FileWriteError>
where
    F: FnOnce(&FileWriter, &mut FragmentSet) -> Result<T, FileWriteError>,
{
    let policy = options.flush_policy;
    let writer = FileWriter::new(options);
    let mut fragments = FragmentSet::new();

    match generate(&writer, &mut fragments) {
        Ok(value) => {
            let report = writer.flush(fragments)?;
            Ok((value, report))
        }
        Err(err) => {
            if policy == FlushPolicy::Always && !fragments.is_empty() {
                warn!(
                    error = %err,
                    fragments = fragments.len(),
                    "generation failed, flushing fragments collected so far"
                );
                if let Err(flush_err) = writer.flush(fragments) {
                    warn!(error = %flush_err, "flush after failed generation also failed");
                }
            }
            Err(err)
        }
    }
}
