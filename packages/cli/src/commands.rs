//! Text renderings of an open session

use anyhow::Result;
use clap::ValueEnum;
use hellion_core::{GameSession, View};
use std::fmt::Write;

/// View selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    /// Folders of loaded documents
    Data,
    /// Orbital hierarchy
    Solar,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Data => View::GameData,
            ViewArg::Solar => View::SolarSystem,
        }
    }
}

/// A view cut off `depth` levels below its root, as an outline or JSON.
pub fn render_tree(session: &GameSession, view: View, depth: usize, json: bool) -> Result<String> {
    let snapshot = session.tree(view).snapshot_to_depth(session.root(view), depth);
    if json {
        Ok(serde_json::to_string_pretty(&snapshot)?)
    } else {
        Ok(snapshot.to_outline())
    }
}

/// Run the session's Find search and list the path of every hit.
pub fn render_search(session: &mut GameSession, view: View, query: &str) -> Result<String> {
    let hits = session.find(view, query)?.results()?.to_vec();
    let tree = session.tree(view);

    let mut out = format!("Search: \"{}\" ({} result(s))\n", query.trim(), hits.len());
    for hit in hits {
        writeln!(out, "  {}", tree.path(hit))?;
    }
    Ok(out)
}

/// Node counts per view and the outcome of the solar-system build.
pub fn render_stats(session: &GameSession) -> Result<String> {
    let mut out = String::new();
    for (label, view) in [("Game Data", View::GameData), ("Solar System", View::SolarSystem)] {
        let count = session.tree(view).descendant_count(session.root(view));
        writeln!(out, "{}: {} node(s)", label, count)?;
    }

    let docking = session.docking_report();
    writeln!(
        out,
        "Docked ships: {} moved, {} already in place",
        docking.moved, docking.already_docked
    )?;

    let report = session.build_report();
    writeln!(out, "Unplaced records: {}", report.unplaced.len())?;
    for record in &report.unplaced {
        writeln!(
            out,
            "  {} {} (parent {})",
            record.set, record.guid, record.parent_guid
        )?;
    }
    Ok(out)
}
