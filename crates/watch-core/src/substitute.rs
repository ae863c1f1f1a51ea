//! Line-oriented streaming text substitution
//!
//! Template downloads and in-place edits both funnel through [`LineSink`]:
//! bytes go in, complete lines come out with every replacement applied and a
//! single newline after each line - including a final line that arrived
//! without one.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Ordered list of literal `(pattern, replacement)` pairs.
///
/// Pairs are applied in order: a later pattern matches against the output of
/// earlier replacements, not a frozen copy of the original line.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// A replacement set with a single pair.
    pub fn single(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            pairs: vec![(from.into(), to.into())],
        }
    }

    pub fn push(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.pairs.push((from.into(), to.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every pair to `line` as a global literal substring replacement.
    pub fn apply(&self, line: &str) -> String {
        let mut out = line.to_string();
        for (from, to) in &self.pairs {
            out = out.replace(from.as_str(), to);
        }
        out
    }
}

/// Streaming line splitter and substituter in front of an async sink.
///
/// Splits on `\n` (a preceding `\r` is stripped), applies the replacement
/// set to each line, and writes the line back out terminated by exactly one
/// newline. Lines may span any number of input chunks.
pub struct LineSink<'a, W> {
    sink: W,
    replacements: &'a Replacements,
    buf: Vec<u8>,
}

impl<'a, W: AsyncWrite + Unpin> LineSink<'a, W> {
    pub fn new(sink: W, replacements: &'a Replacements) -> Self {
        Self {
            sink,
            replacements,
            buf: Vec::new(),
        }
    }

    /// Feed a chunk of bytes; every complete line now in the buffer is
    /// transformed and written to the sink.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.buf.extend_from_slice(chunk);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.emit(&line).await?;
        }
        Ok(())
    }

    /// Write out a trailing line that arrived without a newline, flush the
    /// sink, and hand it back. Completion of the whole pipeline is this one
    /// awaited result.
    pub async fn finish(mut self) -> std::io::Result<W> {
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            self.emit(&rest).await?;
        }
        self.sink.flush().await?;
        Ok(self.sink)
    }

    async fn emit(&mut self, line: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(line);
        let replaced = self.replacements.apply(&text);
        self.sink.write_all(replaced.as_bytes()).await?;
        self.sink.write_all(b"\n").await
    }
}

/// Stream `source` into a freshly created file at `dest`, substituting line
/// by line.
pub async fn write_with_substitution<R>(
    mut source: R,
    dest: &Path,
    replacements: &Replacements,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let file = fs::File::create(dest).await?;
    let mut sink = LineSink::new(file, replacements);
    let mut chunk = [0u8; 8 * 1024];
    loop {
        let n = source.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        sink.write_chunk(&chunk[..n]).await?;
    }
    sink.finish().await?;
    Ok(())
}

/// Failure modes of [`edit_in_place`]. The caller decides which of these
/// abort a run; none of them do on their own.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed renaming {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Re-run the substitution over an existing file.
///
/// The file streams through the line substitution into a `.tmp` sibling,
/// which is then renamed over the original. The temp file is consumed by the
/// rename; on a write or rename failure it is left behind. A missing source
/// fails with [`EditError::Open`] before the temp file is created.
pub async fn edit_in_place(path: &Path, replacements: &Replacements) -> Result<(), EditError> {
    let source = fs::File::open(path).await.map_err(|e| EditError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);

    write_with_substitution(source, &tmp_path, replacements)
        .await
        .map_err(|e| EditError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;

    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| EditError::Rename {
            from: tmp_path,
            to: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacements_apply_sequentially() {
        // The second pattern sees the first replacement's output.
        let mut replacements = Replacements::new();
        replacements.push("ab", "b");
        replacements.push("bc", "X");
        assert_eq!(replacements.apply("abc"), "bX");
    }

    #[test]
    fn replacements_apply_is_global_and_literal() {
        let replacements = Replacements::single("t.pl", "app");
        // A regex would also match "tmpl"; a literal must not.
        assert_eq!(replacements.apply("tmpl t.pl tmpl t.pl"), "tmpl app tmpl app");
    }

    #[test]
    fn replacements_apply_is_idempotent_without_self_overlap() {
        let replacements = Replacements::single("tmpl", "app");
        let once = replacements.apply("tmpl and tmpl again");
        assert_eq!(replacements.apply(&once), once);
    }

    #[tokio::test]
    async fn sink_splits_lines_across_chunk_boundaries() {
        let replacements = Replacements::single("tmpl", "app");
        let mut sink = LineSink::new(Vec::new(), &replacements);
        sink.write_chunk(b"hello tm").await.unwrap();
        sink.write_chunk(b"pl\nworld tmpl").await.unwrap();
        let out = sink.finish().await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello app\nworld app\n");
    }

    #[tokio::test]
    async fn sink_terminates_every_line_with_one_newline() {
        let replacements = Replacements::new();
        let mut sink = LineSink::new(Vec::new(), &replacements);
        sink.write_chunk(b"a\n\nno trailing newline").await.unwrap();
        let out = sink.finish().await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\n\nno trailing newline\n");
    }

    #[tokio::test]
    async fn sink_normalizes_crlf() {
        let replacements = Replacements::new();
        let mut sink = LineSink::new(Vec::new(), &replacements);
        sink.write_chunk(b"a\r\nb\r\n").await.unwrap();
        let out = sink.finish().await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }

    #[tokio::test]
    async fn sink_emits_nothing_for_empty_input() {
        let replacements = Replacements::new();
        let sink = LineSink::new(Vec::new(), &replacements);
        let out = sink.finish().await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn write_with_substitution_creates_transformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        let replacements = Replacements::single("tmpl", "app");
        let source: &[u8] = b"name tmpl here\ntmpl";
        write_with_substitution(source, &dest, &replacements)
            .await
            .unwrap();
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content, "name app here\napp\n");
    }

    #[tokio::test]
    async fn edit_in_place_rewrites_and_consumes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\n  \"name\": \"tmpl\"\n}").unwrap();

        let replacements = Replacements::single("tmpl", "app");
        edit_in_place(&path, &replacements).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"name\": \"app\"\n}\n");
        assert!(!dir.path().join("config.json.tmp").exists());
    }

    #[tokio::test]
    async fn edit_in_place_with_empty_set_preserves_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        edit_in_place(&path, &Replacements::new()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[tokio::test]
    async fn edit_in_place_on_missing_file_fails_with_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = edit_in_place(&path, &Replacements::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::Open { .. }));
        assert!(!dir.path().join("absent.json.tmp").exists());
    }
}
