use crate::terminal::{colors, format, print};
use colored::*;
use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::IpNetwork;

pub fn to_key_value_pair_net(ip_net: &[IpNetwork]) -> Vec<(String, ColoredString)> {
    ip_net
        .iter()
        .map(|ip_network| match ip_network {
            IpNetwork::V4(ipv4_network) => {
                let address: ColoredString = ipv4_network.ip().to_string().color(colors::IPV4_ADDR);
                let prefix: ColoredString =
                    ipv4_network.prefix().to_string().color(colors::IPV4_PREFIX);
                let result: ColoredString = format!("{address}/{prefix}").color(colors::SEPARATOR);
                ("IPv4".to_string(), result)
            }
            IpNetwork::V6(ipv6_network) => {
                let address: ColoredString = ipv6_network.ip().to_string().color(colors::IPV6_ADDR);
                let prefix: ColoredString =
                    ipv6_network.prefix().to_string().color(colors::IPV6_PREFIX);
                let value: ColoredString = format!("{address}/{prefix}").color(colors::SEPARATOR);
                let key: &str = format::ipv6_to_type_str(&ipv6_network.ip());
                (key.to_string(), value)
            }
        })
        .collect()
}

/// Prints one interface as a tree, flagging the one an automatic scan would use.
pub fn print_interface(interface: &NetworkInterface, idx: usize, display_name: &str, is_auto: bool) {
    let title: String = match display_name == interface.name {
        true => interface.name.clone(),
        false => format!("{} ({})", display_name, interface.name),
    };
    print::tree_head(idx, &title);

    let mut key_value_pair: Vec<(String, ColoredString)> = to_key_value_pair_net(&interface.ips);
    if let Some(mac_addr) = interface.mac {
        key_value_pair.push((
            "MAC".to_string(),
            mac_addr.to_string().color(colors::MAC_ADDR),
        ));
    }
    if is_auto {
        key_value_pair.push(("Scan".to_string(), "default".green().bold()));
    }
    print::tree_rows(&key_value_pair);
}
