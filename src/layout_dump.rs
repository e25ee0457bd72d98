use crate::layout::Layout;
use crate::model::Schedule;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable snapshot of one layout pass, for golden files and debugging.
#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub schedule: &'a Schedule,
    pub layout: &'a Layout,
}

impl<'a> LayoutDump<'a> {
    pub fn new(layout: &'a Layout, schedule: &'a Schedule) -> Self {
        LayoutDump { schedule, layout }
    }
}

pub fn dump_json(layout: &Layout, schedule: &Schedule) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::new(
        layout, schedule,
    ))?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout, schedule: &Schedule) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::new(layout, schedule))?;
    Ok(())
}
