//! Configuration module for Artemis Arrow
//!
//! The sensor reads a single configuration file naming the collector
//! endpoint, the control network, the VXLAN Network Identifier, and an
//! optional capture filter. Both JSON and YAML files are accepted; the
//! format is chosen by extension (`.yaml`/`.yml` parse as YAML, anything
//! else as JSON). The original deployments shipped the file as either
//! `conf.yaml` or `conf.json`, so the camelCase key spellings from those
//! files are accepted as aliases.

use std::fs;
use std::net::IpAddr;
use std::path::Path;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use crate::error::{ArrowError, ArrowResult};

/// Largest value representable in the 24-bit VNI field.
pub const VNI_MAX: u32 = 0x00FF_FFFF;

/// Transport protocols the capture filter can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

/// Optional capture filter.
///
/// Every list is an allowlist; an empty list is a wildcard. Port and host
/// lists match either endpoint of a packet, so a single entry covers both
/// directions of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub protocols: Vec<Protocol>,

    #[serde(default)]
    pub ports: Vec<u16>,

    #[serde(default)]
    pub hosts: Vec<IpAddr>,
}

impl FilterConfig {
    /// True when no filter dimension is configured (mirror everything).
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty() && self.ports.is_empty() && self.hosts.is_empty()
    }
}

/// Sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collector address (hostname or IP).
    #[serde(alias = "destHost")]
    pub dest_host: String,

    /// Collector UDP port.
    #[serde(alias = "destPort")]
    pub dest_port: u16,

    /// CIDR of the management network; interfaces with an address in this
    /// network are never captured.
    #[serde(alias = "controlNet")]
    pub control_net: String,

    /// VXLAN Network Identifier tagging this sensor's traffic.
    pub vni: u32,

    /// Optional capture filter.
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> ArrowResult<Self> {
        if !path.exists() {
            return Err(ArrowError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let config: Config = if is_yaml {
            serde_yaml_ng::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check field-level invariants that serde cannot express.
    pub fn validate(&self) -> ArrowResult<()> {
        if self.dest_host.trim().is_empty() {
            return Err(ArrowError::InvalidConfig {
                field: "dest_host".to_string(),
                message: "collector host must not be empty".to_string(),
            });
        }
        if self.dest_port == 0 {
            return Err(ArrowError::InvalidConfig {
                field: "dest_port".to_string(),
                message: "collector port must be non-zero".to_string(),
            });
        }
        if self.vni > VNI_MAX {
            return Err(ArrowError::InvalidConfig {
                field: "vni".to_string(),
                message: format!("{} does not fit in 24 bits", self.vni),
            });
        }
        self.control_network()?;
        Ok(())
    }

    /// The control network as a parsed CIDR.
    pub fn control_network(&self) -> ArrowResult<IpNetwork> {
        self.control_net
            .parse()
            .map_err(|e| ArrowError::InvalidConfig {
                field: "control_net".to_string(),
                message: format!("'{}' is not a valid CIDR: {}", self.control_net, e),
            })
    }

    /// `host:port` string for the collector, used in diagnostics.
    pub fn collector_endpoint(&self) -> String {
        format!("{}:{}", self.dest_host, self.dest_port)
    }
}
