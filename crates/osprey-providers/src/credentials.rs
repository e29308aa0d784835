/// API credentials for the external providers.
///
/// Every field is optional: a missing credential surfaces as a
/// per-request failure for that adapter (or skips the generative
/// narrative), never as a startup error.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// WhoisXML API key (registration lookups)
    pub whoisxml: Option<String>,
    /// VirusTotal API key (threat scans)
    pub virustotal: Option<String>,
    /// IPinfo access token; anonymous access is used when absent
    pub ipinfo: Option<String>,
    /// URLVoid API key (domain reputation)
    pub urlvoid: Option<String>,
    /// OpenAI API key (generative narrative)
    pub openai: Option<String>,
}

impl Credentials {
    /// Read credentials from the conventional environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            whoisxml: read_env("WHOISXML_API_KEY"),
            virustotal: read_env("VIRUSTOTAL_API_KEY"),
            ipinfo: read_env("IPINFO_TOKEN"),
            urlvoid: read_env("URLVOID_API_KEY"),
            openai: read_env("OPENAI_API_KEY"),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
