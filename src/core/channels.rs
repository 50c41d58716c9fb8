// Channel identity: logical names and their lcd-info indices

use crate::core::constants::{CHANNEL_KEY_PREFIX, CHANNEL_KEY_SUFFIX, DATA_EXT};
use crate::core::error::{ForceFileError, Result};
use crate::core::properties::PropertyMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "vDeflection")]
    VDeflection,
    #[serde(rename = "hDeflection")]
    HDeflection,
    #[serde(rename = "height")]
    Height,
    #[serde(rename = "capacitiveSensorHeight")]
    CapacitiveSensorHeight,
}

impl Channel {
    /// Resolution order; the first missing one is reported.
    pub const ALL: [Channel; 4] = [
        Channel::VDeflection,
        Channel::HDeflection,
        Channel::Height,
        Channel::CapacitiveSensorHeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::VDeflection => "vDeflection",
            Channel::HDeflection => "hDeflection",
            Channel::Height => "height",
            Channel::CapacitiveSensorHeight => "capacitiveSensorHeight",
        }
    }

    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn data_file_name(&self) -> String {
        format!("{}{}", self.as_str(), DATA_EXT)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ForceFileError;

    fn from_str(s: &str) -> Result<Self> {
        Channel::from_name(s).ok_or_else(|| ForceFileError::channel(s, "unknown channel"))
    }
}

/// Logical channel -> internal index used as infix in `lcd-info.<i>.` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChannelIndex {
    indices: BTreeMap<Channel, String>,
}

impl ChannelIndex {
    pub fn get(&self, channel: Channel) -> Result<&str> {
        self.indices
            .get(&channel)
            .map(String::as_str)
            .ok_or_else(|| ForceFileError::channel(channel.as_str(), "channel index not resolved"))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &str)> {
        self.indices.iter().map(|(c, i)| (*c, i.as_str()))
    }
}

/// Scans the merged header for `lcd-info.<d>.channel.name=<channel>` pairs.
/// Later keys win; every known channel must be found.
pub fn resolve(general: &PropertyMap) -> Result<ChannelIndex> {
    let mut indices = BTreeMap::new();

    for (key, value) in general.iter() {
        let Some(channel) = Channel::from_name(value) else {
            continue;
        };

        match channel_digit(key) {
            Some(digit) => {
                if let Some(previous) = indices.insert(channel, digit.to_string()) {
                    debug!("channel {} re-mapped from {} to {}", channel, previous, digit);
                }
            }
            None => warn!("key {} names channel {} but carries no index", key, channel),
        }
    }

    for channel in Channel::ALL {
        if !indices.contains_key(&channel) {
            return Err(ForceFileError::channel(
                channel.as_str(),
                "no lcd-info index found in header",
            ));
        }
    }

    Ok(ChannelIndex { indices })
}

// The single digit between `lcd-info.` and `.channel?name`.
fn channel_digit(key: &str) -> Option<char> {
    key.match_indices(CHANNEL_KEY_PREFIX).find_map(|(pos, _)| {
        let rest = &key[pos + CHANNEL_KEY_PREFIX.len()..];
        let mut chars = rest.chars();
        let digit = chars.next().filter(char::is_ascii_digit)?;
        suffix_matches(chars.as_str()).then_some(digit)
    })
}

// `.channel` + any one char + `name`
fn suffix_matches(rest: &str) -> bool {
    let head = &CHANNEL_KEY_SUFFIX[..".channel".len()];
    let tail = &CHANNEL_KEY_SUFFIX[".channel.".len()..];
    let Some(after_head) = rest.strip_prefix(head) else {
        return false;
    };
    let mut chars = after_head.chars();
    chars.next().is_some() && chars.as_str().starts_with(tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::properties::parse_pairs;

    #[test]
    fn test_channel_names() {
        assert_eq!("height".parse::<Channel>().unwrap(), Channel::Height);
        assert_eq!(Channel::VDeflection.data_file_name(), "vDeflection.dat");
        assert!("lateral".parse::<Channel>().unwrap_err().is_channel_resolution());
    }

    #[test]
    fn test_channel_digit() {
        assert_eq!(channel_digit("lcd-info.1.channel.name"), Some('1'));
        assert_eq!(channel_digit("x.lcd-info.7.channel_name.extra"), Some('7'));
        assert_eq!(channel_digit("lcd-info.1.channel.label"), None);
        assert_eq!(channel_digit("lcd-info.12.channel.name"), None);
        assert_eq!(channel_digit("channel.name"), None);
    }

    #[test]
    fn test_resolve() {
        let props = parse_pairs(&[
            "lcd-info.0.channel.name=height",
            "lcd-info.1.channel.name=vDeflection",
            "lcd-info.1.channel.label=vDeflection",
            "lcd-info.2.channel.name=hDeflection",
            "lcd-info.3.channel.name=capacitiveSensorHeight",
        ])
        .unwrap();
        let index = resolve(&props).unwrap();
        assert_eq!(index.get(Channel::VDeflection).unwrap(), "1");
        assert_eq!(index.get(Channel::HDeflection).unwrap(), "2");
        assert_eq!(index.get(Channel::Height).unwrap(), "0");
        assert_eq!(index.get(Channel::CapacitiveSensorHeight).unwrap(), "3");
    }

    #[test]
    fn test_resolve_last_match_wins() {
        let props = parse_pairs(&[
            "lcd-info.0.channel.name=height",
            "lcd-info.1.channel.name=vDeflection",
            "lcd-info.2.channel.name=hDeflection",
            "lcd-info.3.channel.name=capacitiveSensorHeight",
            "lcd-info.5.channel.name=height",
        ])
        .unwrap();
        assert_eq!(resolve(&props).unwrap().get(Channel::Height).unwrap(), "5");
    }

    #[test]
    fn test_resolve_reports_first_missing() {
        let props = parse_pairs(&[
            "lcd-info.1.channel.name=vDeflection",
            "lcd-info.3.channel.name=capacitiveSensorHeight",
        ])
        .unwrap();
        match resolve(&props).unwrap_err() {
            ForceFileError::ChannelResolution { channel, .. } => assert_eq!(channel, "hDeflection"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
