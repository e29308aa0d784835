//! HTTP adapters for the external OSINT providers.
//!
//! One client per provider, each wrapping a single bounded request:
//!
//! - [`WhoisXmlClient`] - domain registration records (WhoisXML)
//! - [`VirusTotalClient`] - threat/malware scan reports (VirusTotal)
//! - [`IpInfoClient`] - IP geolocation (IPinfo), resolving domains
//!   through [`DohResolver`] first
//! - [`UrlVoidClient`] - domain reputation blacklists (URLVoid)
//!
//! Adapters implement [`IntelSource`] so the orchestration layer and the
//! test suite can substitute any one of them independently. Calls are
//! attempted exactly once; failures surface as
//! [`SourceOutcome::Failure`](osprey_core::SourceOutcome) messages, never
//! as panics or retries.

mod credentials;
mod doh;
mod http;
mod ipinfo;
mod source;
mod urlvoid;
mod virustotal;
mod whoisxml;

pub use credentials::Credentials;
pub use doh::DohResolver;
pub use ipinfo::IpInfoClient;
pub use source::IntelSource;
pub use urlvoid::UrlVoidClient;
pub use virustotal::VirusTotalClient;
pub use whoisxml::WhoisXmlClient;
