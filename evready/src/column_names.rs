//! This module stores the serialized field names of the country records, which are used when
//! writing tabular or GeoJSON output. Note that these must be synchronised with the keys emitted
//! by the upstream index pipeline!

pub const COUNTRY_CODE: &str = "country_code";
pub const COUNTRY_NAME: &str = "country_name";
pub const STATIONS: &str = "stations";
pub const MEDIAN_POWER_KW: &str = "median_power_kw";
pub const FAST_DC_SHARE: &str = "fast_dc_share";
pub const UNIQUE_MODELS: &str = "unique_models";
pub const COVERAGE_NORM: &str = "coverage_norm";
pub const CAPACITY_NORM: &str = "capacity_norm";
pub const FASTSHARE_NORM: &str = "fastshare_norm";
pub const AVAILABILITY_NORM: &str = "availability_norm";
pub const EIRI: &str = "EIRI";
pub const GAP_VALUE: &str = "gap_value";
pub const CLUSTER: &str = "cluster";
pub const BASE: &str = "base";
pub const INFRA_HEAVY: &str = "infra_heavy";
pub const AVAILABILITY_HEAVY: &str = "availability_heavy";
pub const LAT: &str = "lat";
pub const LNG: &str = "lng";
