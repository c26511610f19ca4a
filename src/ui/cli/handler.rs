// Wed Jan 15 2026 - Alex

use super::args::{Args, Command, DiffArgs, ReportArgs, ResolveArgs};
use crate::config::LayoutConfig;
use crate::facts::FactSheet;
use crate::fixture::sample_graph;
use crate::structure::{
    ClassGraph, Finding, LayoutComparator, LayoutResolver, LayoutValidator, ResolvedGraph,
    SerializableLayout,
};
use crate::ui::display::LayoutDisplay;
use colored::Colorize;

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args)?;
        if args.no_color {
            colored::control::set_override(false);
        }

        let config = match &args.config {
            Some(path) => LayoutConfig::from_file(path)?,
            None => LayoutConfig::default(),
        };

        match args.command {
            Command::Sample(ref report) => {
                let graph = sample_graph(&config)?;
                self.report(&graph, config, report, args.json)
            }
            Command::Resolve(ref resolve_args) => self.handle_resolve(resolve_args, config, args.json),
            Command::Diff(ref diff_args) => self.handle_diff(diff_args, config),
        }
    }

    fn setup_logging(&self, args: &Args) -> anyhow::Result<()> {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()?;

        Ok(())
    }

    fn handle_resolve(&self, args: &ResolveArgs, config: LayoutConfig, json: bool) -> anyhow::Result<()> {
        let sheet = FactSheet::from_file(&args.facts)?;
        let graph = sheet.into_graph(config.pointer_size)?;
        self.report(&graph, config, &args.report, json)
    }

    fn handle_diff(&self, args: &DiffArgs, config: LayoutConfig) -> anyhow::Result<()> {
        let resolver = LayoutResolver::new(config.clone())?;
        let old_graph = FactSheet::from_file(&args.old)?.into_graph(config.pointer_size)?;
        let new_graph = FactSheet::from_file(&args.new)?.into_graph(config.pointer_size)?;
        let old = resolver.resolve(&old_graph);
        let new = resolver.resolve(&new_graph);

        for comparison in LayoutComparator::compare_graphs(&old, &new) {
            print!("{}", LayoutDisplay::render_comparison(&comparison));
        }
        for name in old.layouts().keys().filter(|name| new.layout(name).is_none()) {
            println!("{} {} removed", "[-]".red(), name);
        }
        for name in new.layouts().keys().filter(|name| old.layout(name).is_none()) {
            println!("{} {} added", "[+]".green(), name);
        }
        Ok(())
    }

    fn report(&self, graph: &ClassGraph, config: LayoutConfig, args: &ReportArgs, json: bool) -> anyhow::Result<()> {
        let check_alignment = config.check_field_alignment;
        let policy = config.descriptor_identity;
        let resolver = LayoutResolver::new(config)?;
        let resolved = resolver.resolve(graph);
        let validator = LayoutValidator::new(graph, &resolved).with_field_alignment_check(check_alignment);
        let findings: Vec<Finding> = validator.findings().collect();

        let selected = self.select(&resolved, args)?;

        if json {
            let layouts: Vec<SerializableLayout> = selected
                .iter()
                .map(|name| {
                    let descriptors = graph
                        .type_descriptors(name)
                        .iter()
                        .map(|d| d.identity(policy))
                        .collect();
                    SerializableLayout::from(&resolved.layouts()[name.as_str()])
                        .with_type_descriptors(descriptors)
                })
                .collect();
            let report = serde_json::json!({
                "layouts": layouts,
                "findings": findings,
                "failures": resolved
                    .failures()
                    .iter()
                    .map(|(root, e)| (root.clone(), e.to_string()))
                    .collect::<std::collections::BTreeMap<_, _>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for name in &selected {
                print!(
                    "{}",
                    LayoutDisplay::render_layout(&resolved.layouts()[name.as_str()], &graph.type_descriptors(name))
                );
                println!();
            }
            print!("{}", LayoutDisplay::render_findings(&findings));
            print!("{}", LayoutDisplay::render_failures(resolved.failures()));
            println!(
                "{} {} classes resolved, {} findings",
                "[+]".green(),
                resolved.layouts().len(),
                findings.len()
            );
        }

        if args.strict && (!findings.is_empty() || !resolved.is_complete()) {
            anyhow::bail!(
                "{} findings, {} dropped hierarchies",
                findings.len(),
                resolved.failures().len()
            );
        }
        Ok(())
    }

    fn select(&self, resolved: &ResolvedGraph, args: &ReportArgs) -> anyhow::Result<Vec<String>> {
        match &args.class {
            Some(class) => {
                resolved.size_of(class)?;
                Ok(vec![class.clone()])
            }
            None => Ok(resolved.layouts().keys().cloned().collect()),
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
