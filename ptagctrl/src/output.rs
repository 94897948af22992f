use ptagcore::tag::Tag;
use std::{
    env,
    fs::OpenOptions,
    io::{
        self,
        Write,
    },
    path::Path,
};

pub const OUTPUT_TAG: &str = "tag";
pub const OUTPUT_TAG_FOUND: &str = "tag-found";

/// Writes step outputs in the format the workflow runner reads back.
pub struct ActionOutput<W> {
    writer: W,
}

impl ActionOutput<Box<dyn Write>> {
    /// Appends to the file named by `GITHUB_OUTPUT`, or falls back to
    /// standard output when running outside of a workflow.
    pub fn from_env() -> io::Result<Self> {
        match env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => Self::append(path),
            _ => Ok(Self::new(Box::new(io::stdout()))),
        }
    }

    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(Box::new(file)))
    }
}

impl<W: Write> ActionOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        if value.contains('\n') || value.contains('\r') {
            let delimiter = delimiter_for(value);
            writeln!(self.writer, "{name}<<{delimiter}")?;
            writeln!(self.writer, "{value}")?;
            writeln!(self.writer, "{delimiter}")?;
        }
        else {
            writeln!(self.writer, "{name}={value}")?;
        }
        self.writer.flush()
    }

    /// Emits `tag` and `tag-found`; the default tag stands in when nothing
    /// was found.
    pub fn write_result(
        &mut self,
        tag: Option<&Tag>,
        default_tag: &str,
    ) -> io::Result<()> {
        match tag {
            Some(tag) => {
                self.set_output(OUTPUT_TAG, &tag.name)?;
                self.set_output(OUTPUT_TAG_FOUND, "true")
            }
            None => {
                self.set_output(OUTPUT_TAG, default_tag)?;
                self.set_output(OUTPUT_TAG_FOUND, "false")
            }
        }
    }
}

fn delimiter_for(value: &str) -> String {
    let mut delimiter = "ghadelimiter".to_string();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// A workflow command that marks the step as failed with `message`.
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
