//! Curated keyword lists for the routing rules.
//!
//! All entries are lower-case and matched as plain substrings against
//! lower-cased input. Lists may overlap; rule order decides.
//!
//! Entries with a leading space (`" cp "`) only match at a word start. The
//! combined text is built as `"<description> <command>"`, so a command that
//! begins with such a verb still matches.

/// Rule 1: output redirection and stream-to-file constructs.
///
/// `>` is matched anywhere, so `2>&1` and `>>` also count as file mutation.
pub const FILE_MUTATION: &[&str] = &[
    ">",
    "| tee",
    "|tee",
    "tee -a",
    "sed -i",
    "dd of=",
    "truncate -s",
];

/// Rule 2: elevation markers, permission/service/disk utilities and
/// credential-file paths.
pub const PRIVILEGE_ESCALATION: &[&str] = &[
    "sudo",
    "su -",
    "su root",
    "doas ",
    "pkexec",
    "chmod",
    "chown",
    "chgrp",
    "chattr",
    "setfacl",
    "systemctl",
    "service ",
    "mount",
    "umount",
    "fdisk",
    "mkfs",
    "parted",
    "lvcreate",
    "visudo",
    "passwd",
    "/etc/shadow",
    "/etc/gshadow",
    "/etc/sudoers",
];

/// Rule 3: firewall, routing-table and interface-configuration utilities.
pub const NETWORK_RECONFIGURATION: &[&str] = &[
    "iptables",
    "ip6tables",
    "nft ",
    "ufw",
    "firewall-cmd",
    "route add",
    "route del",
    "ip route",
    "ip addr add",
    "ip addr del",
    "ip link set",
    "ifconfig",
    "ifup",
    "ifdown",
    "nmcli",
    "netplan",
];

/// Rule 4: package-manager and service-manager verbs.
pub const IDEMPOTENT_OPERATION: &[&str] = &[
    "apt install",
    "apt-get install",
    "apt upgrade",
    "apt-get upgrade",
    "apt-get dist-upgrade",
    "apt remove",
    "apt-get remove",
    "apt-get purge",
    "yum install",
    "yum update",
    "yum remove",
    "dnf install",
    "dnf upgrade",
    "dnf remove",
    "zypper install",
    "zypper in ",
    "pacman -s",
    "pacman -r",
    "apk add",
    "apk del",
    "pip install",
    "pip3 install",
    "npm install -g",
    "gem install",
    "snap install",
    "brew install",
    "update-rc.d",
    "chkconfig",
    "rc-service",
    "rc-update",
];

/// Rule 5: configuration-change verbs (description + command).
pub const CONFIG_CHANGE: &[&str] = &[
    "install",
    "configure",
    "setup",
    "set up",
    "create",
    "delete",
    "remove",
    "modify",
    "update",
    "upgrade",
    "restart",
    "reload",
    "start",
    "stop",
    "enable",
    "disable",
    "mount",
    "backup",
    "restore",
    "deploy",
    "provision",
    "edit",
    "change",
    "write",
    "mkdir",
    "useradd",
    "userdel",
    "usermod",
    "groupadd",
    " rm ",
    " mv ",
    " cp ",
    " touch ",
];

/// Rule 6: read-only / observability verbs (description + command).
pub const STATUS_QUERY: &[&str] = &[
    "status",
    "list",
    "check",
    "show",
    "view",
    "inspect",
    "monitor",
    "ps ",
    "df",
    "du -",
    "free",
    "uptime",
    "tail",
    "head",
    "cat ",
    "less ",
    "grep",
    "find",
    "ls",
    "top",
    "who",
    "netstat",
    "ss -",
    "lsof",
    "journalctl",
    "dmesg",
    "log",
    "version",
    "uname",
    "hostname",
    "ping",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_lists() -> [&'static [&'static str]; 6] {
        [
            FILE_MUTATION,
            PRIVILEGE_ESCALATION,
            NETWORK_RECONFIGURATION,
            IDEMPOTENT_OPERATION,
            CONFIG_CHANGE,
            STATUS_QUERY,
        ]
    }

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        for list in all_lists() {
            assert!(!list.is_empty());
            for keyword in list {
                assert!(!keyword.trim().is_empty());
                assert_eq!(*keyword, keyword.to_lowercase(), "{keyword:?}");
            }
        }
    }

    #[test]
    fn test_mount_overlaps_privilege_and_config_change() {
        assert!(PRIVILEGE_ESCALATION.contains(&"mount"));
        assert!(CONFIG_CHANGE.contains(&"mount"));
    }
}
