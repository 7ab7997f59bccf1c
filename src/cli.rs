use clap::Parser;

use crate::settings::Settings;

#[derive(Parser, Debug)]
#[command(version, about = "Convert VPN subscription links into sing-box configs", long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        conflicts_with = "link",
        help = "Subscription text, accept file path or URL (stdin when omitted)"
    )]
    pub input: Option<String>,

    #[arg(short, long, help = "Convert a single link")]
    pub link: Option<String>,

    #[arg(short, long, help = "Settings TOML, accept file path or URL")]
    pub config: Option<String>,

    #[arg(short, long, help = "Report output path (stdout when omitted)")]
    pub output: Option<String>,

    #[arg(short, long, help = "Record per-link conversion errors in the report")]
    pub debug: bool,

    #[arg(short, long, help = "Enable h2mux multiplex for VLESS outbounds")]
    pub multiplex: bool,

    #[arg(long, help = "Suffix repeated outbound tags with -2, -3, ...")]
    pub unique_tags: bool,

    #[arg(long, help = "Maximum number of configs per batch")]
    pub max_configs: Option<usize>,

    #[arg(long, value_name = "URL", help = "Post batch results to a ping checker")]
    pub submit: Option<String>,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}

impl Args {
    /// Applies command-line overrides on top of loaded settings
    ///
    /// Boolean flags only ever switch features on.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.converter.debug |= self.debug;
        settings.converter.multiplex |= self.multiplex;
        settings.converter.unique_tags |= self.unique_tags;
        if let Some(max) = self.max_configs {
            settings.max_configs = max;
        }
        if let Some(url) = &self.submit {
            settings.checker.url = Some(url.clone());
        }
    }
}
