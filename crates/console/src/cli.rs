use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logirisk-console",
    version,
    about = "Route risk analysis console backed by a generative model"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/console.toml")]
    pub(crate) config: PathBuf,
    #[arg(long, default_value = "127.0.0.1:19320")]
    pub(crate) listen_addr: String,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    /// File name prefix; the date is appended on rotation.
    #[arg(long, default_value = "logirisk-console.log")]
    pub(crate) log_file: String,
    /// Filter directives used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub(crate) log_filter: String,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::try_parse_from(["logirisk-console"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config/console.toml"));
        assert_eq!(args.listen_addr, "127.0.0.1:19320");
        assert_eq!(args.log_file, "logirisk-console.log");
        assert_eq!(args.log_filter, "info");
        assert!(!args.log_to_stderr);
    }

    #[test]
    fn log_flags_override_defaults() {
        let args = Args::try_parse_from([
            "logirisk-console",
            "--log-dir",
            "/var/log/logirisk",
            "--log-file",
            "risk.log",
            "--log-filter",
            "risk_client=debug,info",
            "--log-to-stderr",
        ])
        .unwrap();
        assert_eq!(args.log_dir, PathBuf::from("/var/log/logirisk"));
        assert_eq!(args.log_file, "risk.log");
        assert_eq!(args.log_filter, "risk_client=debug,info");
        assert!(args.log_to_stderr);
    }
}
