use lanmap_common::network::adapter::{AdapterNameResolver, SystemAdapterNames};
use lanmap_common::network::interface;
use pnet::datalink::{self, NetworkInterface};

use crate::mprint;
use crate::terminal::{network_fmt, print};

pub fn interfaces(q_level: u8) -> anyhow::Result<()> {
    let all: Vec<NetworkInterface> = datalink::interfaces();
    if all.is_empty() {
        print::no_results();
        return Ok(());
    }

    let auto_pick: Option<&str> = interface::auto_select(&all).map(|intf| intf.name.as_str());
    let names = SystemAdapterNames;

    print::header("network interfaces", q_level);
    for (idx, intf) in all.iter().enumerate() {
        let display_name: String = names
            .resolve_adapter_name(&intf.name)
            .unwrap_or_else(|_| intf.name.clone());
        network_fmt::print_interface(intf, idx, &display_name, auto_pick == Some(intf.name.as_str()));
        if idx + 1 != all.len() {
            mprint!();
        }
    }

    if q_level == 0 {
        print::end_of_program();
    }
    Ok(())
}
