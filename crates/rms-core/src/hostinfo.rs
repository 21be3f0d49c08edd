//! Normalisation of host attributes reported by the CMDB.
//!
//! OS names arrive in many vendor spellings and switches are reported as IP
//! lists; both are reduced to stable tokens before they are matched against
//! apply requests.

use std::sync::LazyLock;

use regex::Regex;

static TENCENT_OS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tencent").expect("static regex is valid"));
// Any separator between digit groups, `2.26` yields `2.2`.
static OS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(.\d)+").expect("static regex is valid"));

/// Prefix of normalised Tencent OS names, spelled as in stored pool data.
pub const TENCENT_OS_PREFIX: &str = "tliunx-";
static WINDOWS_SERVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Windows\s*Server\s*\d{4}").expect("static regex is valid")
});
static SWITCH_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,]").expect("static regex is valid"));

/// Reduce a raw OS name to the token used for matching.
///
/// `Tencent tlinux release 2.2 (Final)` becomes `tliunx-2.2`,
/// `Microsoft Windows Server 2019 Datacenter` becomes `WindowsServer2019`.
/// Anything else is returned unchanged.
#[must_use]
pub fn clean_os_name(os_name: &str) -> String {
    if TENCENT_OS.is_match(os_name.trim()) {
        let version = OS_VERSION.find(os_name).map_or("", |m| m.as_str());
        return format!("{TENCENT_OS_PREFIX}{version}");
    }
    if let Some(m) = WINDOWS_SERVER.find(os_name) {
        return m.as_str().replace(' ', "").trim().to_string();
    }
    os_name.to_string()
}

/// Derive a net device id from the inner switch IPs of a host.
///
/// Hosts behind the same switches get the same id, so the id can stand in for
/// a switch identity when spreading hosts across switches.
#[must_use]
pub fn net_device_id_from_switch_ips(inner_switch_ips: &str) -> String {
    if inner_switch_ips.is_empty() {
        return String::new();
    }
    let mut ids: Vec<String> = Vec::new();
    for ip in SWITCH_SEPARATOR.split(inner_switch_ips) {
        let id = format!("{:08x}", crc32q(ip.as_bytes()));
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.join(",")
}

/// Reflected CRC-32Q polynomial.
const CRC32Q_REFLECTED: u32 = 0xD582_8281;

static CRC32Q_TABLE: [u32; 256] = build_crc_table(CRC32Q_REFLECTED);

const fn build_crc_table(poly: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

fn crc32q(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc = CRC32Q_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Tencent tlinux release 2.2 (Final)", "tliunx-2.2")]
    #[case("  tencentos Server 3.1 (Final)", "tliunx-3.1")]
    #[case("Tencent tlinux release 2.26", "tliunx-2.2")]
    #[case("Tencent 12345", "tliunx-12345")]
    #[case("Tencent tlinux", "tliunx-")]
    #[case("Microsoft Windows Server 2019 Datacenter", "WindowsServer2019")]
    #[case("windows server2012 R2", "windowsserver2012")]
    #[case("CentOS Linux 7.9", "CentOS Linux 7.9")]
    fn os_names_are_cleaned(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(clean_os_name(raw), expected);
    }

    #[test]
    fn empty_switch_list_has_no_device_id() {
        assert_eq!(net_device_id_from_switch_ips(""), "");
    }

    #[test]
    fn device_ids_are_hex_and_deduplicated() {
        let single = net_device_id_from_switch_ips("10.0.0.1");
        assert_eq!(single.len(), 8);
        assert!(single.chars().all(|c| c.is_ascii_hexdigit()));

        let joined = net_device_id_from_switch_ips("10.0.0.1;10.0.0.2,10.0.0.1");
        let parts: Vec<&str> = joined.split(',').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], single);
        assert_ne!(parts[0], parts[1]);
    }

    #[test]
    fn crc_of_empty_input_is_zero() {
        assert_eq!(crc32q(b""), 0);
    }

    #[test]
    fn crc_matches_reference_check_values() {
        assert_eq!(crc32q(b"123456789"), 0xa9cc_8179);
        assert_eq!(net_device_id_from_switch_ips("10.0.0.1"), "ae4f436b");
        assert_eq!(
            net_device_id_from_switch_ips("10.0.0.1,10.0.0.2"),
            "ae4f436b,afe4466e"
        );
    }
}
