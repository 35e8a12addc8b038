//! Example demonstrating a switch port bookkeeping table
//!
//! This example shows how to:
//! - Declare a schema with several key sets over the same fields
//! - Insert, look up, update, and delete port records
//! - Render the whole table as an aligned grid

use memdb_core::record::Row;
use memdb_core::schema::{Field, FieldType, Schema};
use memdb_core::table::Table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::new(
        vec![
            Field::new("dpid", FieldType::Int),
            Field::new("port_name", FieldType::Str),
            Field::new("port_no", FieldType::Int),
        ],
        vec![
            vec!["dpid", "port_name"],
            vec!["dpid"],
            vec!["port_name"],
            vec!["dpid", "port_no"],
        ],
    )?;
    let mut table = Table::new("ports", schema);

    println!("MemDB Port Tracker Example");
    println!("==========================");

    // Two switches, two ports each
    for dpid in 1..=2i64 {
        for port_no in 1..=2i64 {
            table.insert(
                Row::new()
                    .with("dpid", dpid)
                    .with("port_name", format!("veth{port_no}"))
                    .with("port_no", port_no),
            )?;
        }
    }
    println!("\nAll ports:\n{table}");

    // Every port of one switch
    let ports = table.get(&Row::new().with("dpid", 1))?;
    println!("Switch 1 carries {} port(s)", ports.len());

    // The same port name across all switches
    let ports = table.get(&Row::new().with("port_name", "veth1"))?;
    println!("Port veth1 appears on {} switch(es)", ports.len());

    // Renumber one port; the (dpid, port_no) index follows the change
    table.update(
        Row::new()
            .with("dpid", 1)
            .with("port_name", "veth1")
            .with("port_no", 10),
    )?;
    let port = table
        .get_one(&Row::new().with("dpid", 1).with("port_no", 10))?
        .ok_or("renumbered port disappeared")?;
    println!(
        "Port {} on switch 1 is now number 10",
        port.get("port_name").and_then(|v| v.as_str()).unwrap_or("?")
    );

    // Drop every port named veth2, whatever switch it lives on
    let removed = table.delete(&Row::new().with("port_name", "veth2"))?;
    println!("Removed {removed} port(s) named veth2");
    println!("\nRemaining:\n{table}");

    Ok(())
}
