// Azure Service Management endpoints
pub const DEFAULT_ENDPOINT: &str = "https://management.core.windows.net";
pub const API_VERSION: &str = "2012-03-01";
pub const IMAGES: &str = "/services/images";
pub const HOSTED_SERVICES: &str = "/services/hostedservices";
pub const AZURE_XML_NAMESPACE: &str = "http://schemas.microsoft.com/windowsazure";
pub const XML_SCHEMA_INSTANCE: &str = "http://www.w3.org/2001/XMLSchema-instance";

// Owner sentinels standing in for account ids
pub const MICROSOFT: &str = "--microsoft--";
pub const PUBLIC: &str = "--public--";
pub const CANONICAL: &str = "--Canonical--";

// Configuration defaults
pub const ENV_PREFIX: &str = "AZURE_";
pub const DEFAULT_REGION: &str = "East US";
pub const DEFAULT_MAX_CONCURRENT_CAPTURES: usize = 4;
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 1800;

pub const PROVIDER_TERM_FOR_IMAGE: &str = "OS image";
pub const SQL_SERVER: &str = "SQL Server";
pub const CAPTURE_SUBMITTED_PERCENT: f64 = 2.0;
