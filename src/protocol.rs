//! Firmware dialects: status decoding and command encoding
//!
//! Matrices in the field run one of two incompatible firmwares. Each is
//! described by a [`Codec`] entry and selected through [`Dialect`], so the two
//! protocols never share a code path.

use crate::types::{SourceId, SwitchState, ZoneId, MAX_PORT};
use serde::Deserialize;

/// Status endpoint of the `&`-delimited firmware
pub const AUTO_DATA_STATUS_PATH: &str = "/AutoGetAllData";

/// Status endpoint of the CGI/JSON firmware
pub const CGI_STATUS_PATH: &str = "/cgi-bin/query";

/// Number of trailing characters of an AutoGetAllData body holding the routing table
const AUTO_DATA_WINDOW: usize = 16;

/// Fixed base the CGI command checksum is subtracted from
const CGI_CHECKSUM_BASE: u8 = 0xfb;

/// Firmware dialect spoken by a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Not negotiated yet
    #[default]
    Unknown,

    /// `GET /AutoGetAllData` status, `GET /@PORT{zone}={source}.0` commands
    AutoData,

    /// `GET /cgi-bin/query` JSON status, checksummed hex frames on `/cgi-bin/submit`
    CgiBin,

    /// Probed, and the device answered neither dialect
    Unsupported,
}

/// Per-dialect status decoder and command encoder
struct Codec {
    status_path: &'static str,
    decode: fn(&[u8]) -> Vec<Option<u8>>,
    command_path: fn(ZoneId, SourceId) -> String,
}

static AUTO_DATA: Codec = Codec {
    status_path: AUTO_DATA_STATUS_PATH,
    decode: decode_auto_data,
    command_path: auto_data_command,
};

static CGI_BIN: Codec = Codec {
    status_path: CGI_STATUS_PATH,
    decode: decode_cgi_bin,
    command_path: cgi_bin_command,
};

impl Dialect {
    /// Dialects a probe tries, in precedence order
    pub const NEGOTIABLE: [Dialect; 2] = [Dialect::AutoData, Dialect::CgiBin];

    fn codec(self) -> Option<&'static Codec> {
        match self {
            Dialect::AutoData => Some(&AUTO_DATA),
            Dialect::CgiBin => Some(&CGI_BIN),
            Dialect::Unknown | Dialect::Unsupported => None,
        }
    }

    /// Whether this dialect can be spoken to
    pub fn is_negotiated(self) -> bool {
        self.codec().is_some()
    }

    /// Path of the status endpoint
    pub fn status_path(self) -> Option<&'static str> {
        self.codec().map(|c| c.status_path)
    }

    /// Decode a status body into 1-based source indices, one entry per zone
    ///
    /// Entries that failed to parse are `None`. An unreadable body yields an
    /// empty table.
    pub fn decode_table(self, raw: &[u8]) -> Vec<Option<u8>> {
        self.codec().map(|c| (c.decode)(raw)).unwrap_or_default()
    }

    /// Whether a status body decodes into a complete routing table
    pub fn accepts(self, raw: &[u8]) -> bool {
        let table = self.decode_table(raw);
        !table.is_empty() && table.iter().all(Option::is_some)
    }

    /// Decode the state of a single zone from a status body
    pub fn decode(self, raw: &[u8], zone: ZoneId) -> SwitchState {
        self.decode_table(raw)
            .get(zone.index())
            .copied()
            .flatten()
            .map_or(SwitchState::Unavailable, SwitchState::On)
    }

    /// Path (and query) of the command routing `source` to `zone`
    pub fn command_path(self, zone: ZoneId, source: SourceId) -> Option<String> {
        self.codec().map(|c| (c.command_path)(zone, source))
    }
}

// AutoGetAllData: the body ends with `&`-separated zero-based indices followed
// by one terminator character.
fn decode_auto_data(raw: &[u8]) -> Vec<Option<u8>> {
    let text = String::from_utf8_lossy(raw);
    let chars: Vec<char> = text.chars().collect();

    let end = chars.len().saturating_sub(1);
    let start = chars.len().saturating_sub(AUTO_DATA_WINDOW).min(end);
    let window: String = chars[start..end].iter().collect();

    window
        .split('&')
        .take(usize::from(MAX_PORT))
        .map(|token| {
            token
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|index| index.checked_add(1))
                .and_then(|index| u8::try_from(index).ok())
        })
        .collect()
}

fn auto_data_command(zone: ZoneId, source: SourceId) -> String {
    format!("/@PORT{}={}.0", zone, source)
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(rename = "SwitchStatus")]
    switch_status: Vec<i64>,
}

fn decode_cgi_bin(raw: &[u8]) -> Vec<Option<u8>> {
    match serde_json::from_slice::<QueryResponse>(raw) {
        Ok(response) => response
            .switch_status
            .into_iter()
            .map(|index| u8::try_from(index).ok())
            .collect(),
        Err(e) => {
            tracing::debug!("Unreadable query response: {}", e);
            Vec::new()
        }
    }
}

/// Checksum byte of a CGI command frame
pub fn cgi_checksum(zone: ZoneId, source: SourceId) -> u8 {
    CGI_CHECKSUM_BASE.wrapping_sub(source.get().wrapping_add(zone.get()))
}

/// 13-byte CGI command frame routing `source` to `zone`
pub fn cgi_frame(zone: ZoneId, source: SourceId) -> [u8; 13] {
    [
        0xa5,
        0x5b,
        0x02,
        0x03,
        source.get(),
        0x00,
        zone.get(),
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        cgi_checksum(zone, source),
    ]
}

// Payload bytes are rendered as two hex digits. Ids never exceed 8, so this
// matches the firmware's zero-padded decimal ids. The checksum has no fixed width.
fn cgi_bin_command(zone: ZoneId, source: SourceId) -> String {
    let [payload @ .., checksum] = cgi_frame(zone, source);

    let mut bytes: Vec<String> = payload.iter().map(|b| format!("{:02x}", b)).collect();
    bytes.push(format!("{:x}", checksum));

    format!("/cgi-bin/submit?cmd=hex({})", bytes.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: u8) -> ZoneId {
        ZoneId::new(id).unwrap()
    }

    fn source(id: u8) -> SourceId {
        SourceId::new(id).unwrap()
    }

    #[test]
    fn auto_data_indices_are_incremented() {
        let body = b"<html>status:0&1&2&3&4&5&6&7\n";
        let table = Dialect::AutoData.decode_table(body);
        let expected: Vec<Option<u8>> = (1..=8).map(Some).collect();
        assert_eq!(table, expected);

        for id in 1..=8 {
            assert_eq!(Dialect::AutoData.decode(body, zone(id)), SwitchState::On(id));
        }
        assert!(Dialect::AutoData.accepts(body));
    }

    #[test]
    fn auto_data_bad_token_only_affects_its_zone() {
        let body = b"xx3&0&x&1&2&2&2&2;";
        assert_eq!(Dialect::AutoData.decode(body, zone(1)), SwitchState::On(4));
        assert_eq!(Dialect::AutoData.decode(body, zone(3)), SwitchState::Unavailable);
        assert_eq!(Dialect::AutoData.decode(body, zone(8)), SwitchState::On(3));
        assert!(!Dialect::AutoData.accepts(body));
    }

    #[test]
    fn auto_data_short_body_is_unavailable() {
        assert_eq!(Dialect::AutoData.decode(b"", zone(1)), SwitchState::Unavailable);
        assert_eq!(Dialect::AutoData.decode(b"1&2\n", zone(2)), SwitchState::On(3));
        assert_eq!(Dialect::AutoData.decode(b"1&2\n", zone(3)), SwitchState::Unavailable);
        assert!(!Dialect::AutoData.accepts(b"not a matrix"));
    }

    #[test]
    fn cgi_indices_are_used_directly() {
        let body = br#"{"SwitchStatus":[1,2,3,4,5,6,7,8]}"#;
        for id in 1..=8 {
            assert_eq!(Dialect::CgiBin.decode(body, zone(id)), SwitchState::On(id));
        }
        assert!(Dialect::CgiBin.accepts(body));
    }

    #[test]
    fn cgi_missing_or_malformed_is_unavailable() {
        assert_eq!(
            Dialect::CgiBin.decode(br#"{"Other":[1]}"#, zone(1)),
            SwitchState::Unavailable
        );
        assert_eq!(Dialect::CgiBin.decode(b"{not json", zone(1)), SwitchState::Unavailable);
        assert_eq!(
            Dialect::CgiBin.decode(br#"{"SwitchStatus":[2,3]}"#, zone(5)),
            SwitchState::Unavailable
        );
        assert!(!Dialect::CgiBin.accepts(br#"{"SwitchStatus":[]}"#));
    }

    #[test]
    fn cgi_zero_index_is_on_with_unknown_source() {
        let body = br#"{"SwitchStatus":[0,2]}"#;
        assert_eq!(Dialect::CgiBin.decode(body, zone(1)), SwitchState::On(0));
    }

    #[test]
    fn unnegotiated_dialects_decode_nothing() {
        let body = br#"{"SwitchStatus":[1,2,3,4,5,6,7,8]}"#;
        assert_eq!(Dialect::Unknown.decode(body, zone(1)), SwitchState::Unavailable);
        assert_eq!(Dialect::Unsupported.command_path(zone(1), source(1)), None);
        assert!(!Dialect::Unknown.is_negotiated());
    }

    #[test]
    fn auto_data_command_path() {
        assert_eq!(
            Dialect::AutoData.command_path(zone(2), source(7)).as_deref(),
            Some("/@PORT2=7.0")
        );
    }

    #[test]
    fn cgi_checksum_matches_firmware() {
        assert_eq!(cgi_checksum(zone(3), source(5)), 0xf3);
        assert_eq!(cgi_checksum(zone(8), source(8)), 0xeb);
        assert_eq!(cgi_checksum(zone(1), source(1)), 0xf9);
    }

    #[test]
    fn cgi_command_path() {
        let path = Dialect::CgiBin.command_path(zone(3), source(5)).unwrap();
        assert_eq!(
            path,
            "/cgi-bin/submit?cmd=hex(a5,5b,02,03,05,00,03,00,00,00,00,00,f3)"
        );
        assert_eq!(Dialect::CgiBin.command_path(zone(3), source(5)).unwrap(), path);
    }
}
