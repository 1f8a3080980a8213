use super::ladder::format_temperature;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;

/// Placeholder token replaced by the replicate temperature.
pub const MARKER: &str = "TempGoesHere";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template file not found: '{path}'", path = path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Line counts collected while rendering a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub lines: usize,
    pub substituted_lines: usize,
}

/// Side of a render that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Read,
    Write,
}

/// Copies `reader` to `writer` line by line, replacing every [`MARKER`] with `replacement`.
///
/// Lines are handled as raw bytes: lines without the marker are written
/// unchanged, including their line terminators and any non-UTF-8 content, so
/// the output has exactly as many lines as the input.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn render_to(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    replacement: &str,
) -> io::Result<RenderSummary> {
    render_lines(reader, writer, replacement.as_bytes()).map_err(|(_, e)| e)
}

fn render_lines(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    replacement: &[u8],
) -> Result<RenderSummary, (Stream, io::Error)> {
    let mut summary = RenderSummary::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| (Stream::Read, e))?;
        if read == 0 {
            break;
        }
        summary.lines += 1;

        let written = if contains_marker(&line) {
            summary.substituted_lines += 1;
            writer.write_all(&replace_marker(&line, replacement))
        } else {
            writer.write_all(&line)
        };
        written.map_err(|e| (Stream::Write, e))?;
    }

    Ok(summary)
}

fn contains_marker(line: &[u8]) -> bool {
    line.windows(MARKER.len()).any(|w| w == MARKER.as_bytes())
}

fn replace_marker(line: &[u8], replacement: &[u8]) -> Vec<u8> {
    let marker = MARKER.as_bytes();
    let mut out = Vec::with_capacity(line.len() + replacement.len());
    let mut rest = line;
    while let Some(pos) = rest.windows(marker.len()).position(|w| w == marker) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + marker.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// Renders `template` into `output` for a replicate at `temperature`.
///
/// The template is opened before the output file is created, so a missing
/// template never leaves an empty parameter file behind. An existing output
/// file is overwritten.
pub fn render_file(
    template: &Path,
    output: &Path,
    temperature: f64,
) -> Result<RenderSummary, TemplateError> {
    let source = File::open(template).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TemplateError::NotFound {
            path: template.to_path_buf(),
        },
        _ => TemplateError::Io {
            path: template.to_path_buf(),
            source: e,
        },
    })?;

    let out_err = |source: io::Error| TemplateError::Io {
        path: output.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(output).map_err(out_err)?);
    let mut reader = BufReader::new(source);

    let replacement = format_temperature(temperature);
    let summary = render_lines(&mut reader, &mut writer, replacement.as_bytes()).map_err(
        |(stream, source)| match stream {
            Stream::Read => TemplateError::Io {
                path: template.to_path_buf(),
                source,
            },
            Stream::Write => out_err(source),
        },
    )?;
    writer.flush().map_err(out_err)?;

    trace!(
        "Rendered {:?} -> {:?} ({} of {} lines substituted).",
        template, output, summary.substituted_lines, summary.lines
    );
    Ok(summary)
}
