use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "aurora-service")]
#[command(about = "Polls an Aurora inverter and uploads readings to PVOutput")]
pub struct ServiceArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "Config.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate the configuration, print a summary and exit
    #[arg(long)]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServiceArgs::parse_from(["aurora-service"]);
        assert_eq!(args.config, "Config.toml");
        assert!(!args.verbose);
        assert!(!args.check);
    }

    #[test]
    fn test_flags() {
        let args = ServiceArgs::parse_from(["aurora-service", "-c", "/etc/aurora.toml", "-v", "--check"]);
        assert_eq!(args.config, "/etc/aurora.toml");
        assert!(args.verbose);
        assert!(args.check);
    }
}
