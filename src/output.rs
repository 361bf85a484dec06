use crate::speech::ViewRecord;
use anyhow::{Result, anyhow};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const HEADER: [&str; 9] = [
    "proceeding",
    "media",
    "title",
    "speaker",
    "url",
    "matching",
    "char_count",
    "word_count",
    "duration",
];

pub type Sink = Box<dyn Write + Send>;

pub enum Writer<W: Write> {
    Json(W, bool), // bool tracks if we've written the opening bracket
    Jsonl(W),
    Csv(W, bool), // bool tracks if we've written headers
    Tsv(W, bool),
}

impl<W: Write> Writer<W> {
    pub fn write_batch(&mut self, records: &[ViewRecord]) -> Result<()> {
        match self {
            Writer::Json(writer, is_first) => {
                for record in records {
                    if *is_first {
                        write!(writer, "[")?;
                        *is_first = false;
                    } else {
                        write!(writer, ",")?;
                    }
                    let serialized = serde_json::to_string_pretty(record)?;
                    write!(writer, "\n{}", serialized)?;
                }
            }
            Writer::Jsonl(writer) => {
                for record in records {
                    let serialized = serde_json::to_string(record)?;
                    writeln!(writer, "{}", serialized)?;
                }
            }
            Writer::Csv(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", HEADER.join(","))?;
                    *headers_written = true;
                }
                for record in records {
                    let fields = fields(record);
                    let escaped: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
                    writeln!(writer, "{}", escaped.join(","))?;
                }
            }
            Writer::Tsv(writer, headers_written) => {
                if !*headers_written {
                    writeln!(writer, "{}", HEADER.join("\t"))?;
                    *headers_written = true;
                }
                for record in records {
                    let fields = fields(record);
                    let escaped: Vec<String> = fields.iter().map(|f| escape_tsv_field(f)).collect();
                    writeln!(writer, "{}", escaped.join("\t"))?;
                }
            }
        }
        Ok(())
    }

    /// Close the document and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        match self {
            Writer::Json(ref mut writer, is_first) => {
                if is_first {
                    write!(writer, "[")?;
                }
                writeln!(writer, "\n]")?;
                writer.flush()?;
            }
            Writer::Jsonl(ref mut writer)
            | Writer::Csv(ref mut writer, _)
            | Writer::Tsv(ref mut writer, _) => {
                writer.flush()?;
            }
        }
        Ok(match self {
            Writer::Json(w, _) | Writer::Jsonl(w) | Writer::Csv(w, _) | Writer::Tsv(w, _) => w,
        })
    }
}

fn fields(record: &ViewRecord) -> [String; 9] {
    [
        record.proceeding.to_string(),
        record.media.to_string(),
        record.title.clone(),
        record.speaker.clone(),
        record.url.clone(),
        record.matching.as_str().to_string(),
        record.char_count.to_string(),
        record.word_count.to_string(),
        record.duration.to_string(),
    ]
}

pub fn create_writer(output_arg: &str) -> Result<Writer<Sink>> {
    match output_arg {
        "stdout" => Ok(Writer::Jsonl(Box::new(io::stdout()))),
        "json" => Ok(Writer::Json(Box::new(io::stdout()), true)), // JSON array to stdout
        path if path.ends_with(".json") => Ok(Writer::Json(create_file(path)?, true)),
        path if path.ends_with(".jsonl") || path.ends_with(".ndjson") => {
            Ok(Writer::Jsonl(create_file(path)?))
        }
        path if path.ends_with(".csv") => Ok(Writer::Csv(create_file(path)?, false)),
        path if path.ends_with(".tsv") => Ok(Writer::Tsv(create_file(path)?, false)),
        path => {
            // Default to JSON file if it looks like a path
            if target_path(path).is_some() {
                Ok(Writer::Json(create_file(path)?, true))
            } else {
                Err(anyhow!(
                    "Unknown output format: {}. Use 'stdout', 'json', or a file path",
                    output_arg
                ))
            }
        }
    }
}

/// The file `create_writer` writes to, if the target is a file.
pub fn target_path(output_arg: &str) -> Option<&Path> {
    match output_arg {
        "stdout" | "json" => None,
        path if path.contains('/') || path.contains('\\') || path.contains('.') => {
            Some(Path::new(path))
        }
        _ => None,
    }
}

fn create_file(file_path: &str) -> Result<Sink> {
    if let Some(parent) = Path::new(file_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(file_path)?;
    Ok(Box::new(BufWriter::new(file)))
}

fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn escape_tsv_field(field: &str) -> String {
    field
        .replace('\t', " ")
        .replace('\n', " ")
        .replace('\r', " ")
}
