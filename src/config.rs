use clap::{Parser, ValueEnum};

/// What to do with a speech that lacks a field the view record needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MissingPolicy {
    /// Stop at the first bad speech.
    #[default]
    Fail,
    /// Drop it and log a warning.
    Skip,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Normalize parliamentary session data into chart-ready records", long_about = None)]
pub struct Config {
    /// Input format: json, jsonl or auto
    #[arg(short, long, env = "SPEECHNORM_FORMAT", default_value = "auto")]
    pub format: String,

    /// stdout, json, or an output file path (.json, .jsonl, .csv, .tsv)
    #[arg(short, long, env = "SPEECHNORM_OUTPUT", default_value = "stdout")]
    pub output: String,

    /// Speeches lacking agendaItem, speechIndex or a speaker: `fail` aborts
    /// the run, `skip` drops them, so the output can hold fewer records than
    /// the input has speeches
    #[arg(long, value_enum, env = "SPEECHNORM_ON_MISSING", default_value_t = MissingPolicy::Fail)]
    pub on_missing: MissingPolicy,

    /// Session files; `-` reads stdin
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// Records per batch handed to the output writer
    #[arg(long, default_value = "10000")]
    pub batch_size: usize,

    /// Print per-session matching statistics to stderr
    #[arg(long)]
    pub stats: bool,

    /// Print input size, timing and throughput to stderr
    #[arg(long)]
    pub benchmark: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::try_parse_from(["speechnorm", "19007-merged.json"]).unwrap();
        assert_eq!(c.format, "auto");
        assert_eq!(c.output, "stdout");
        assert_eq!(c.on_missing, MissingPolicy::Fail);
        assert_eq!(c.batch_size, 10000);
        assert_eq!(c.files, vec!["19007-merged.json"]);
        assert!(!c.stats);
    }

    #[test]
    fn flags() {
        let c = Config::try_parse_from([
            "speechnorm",
            "--on-missing",
            "skip",
            "-o",
            "out/view.csv",
            "--stats",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert_eq!(c.on_missing, MissingPolicy::Skip);
        assert_eq!(c.output, "out/view.csv");
        assert!(c.stats);
        assert_eq!(c.files.len(), 2);
    }

    #[test]
    fn help_explains_skip() {
        use clap::CommandFactory;
        let help = Config::command().render_long_help().to_string();
        assert!(help.contains("fewer records"));
        assert!(help.contains("Records per batch"));
    }

    #[test]
    fn requires_a_file() {
        assert!(Config::try_parse_from(["speechnorm"]).is_err());
    }
}
