// Wed Jan 15 2026 - Alex

use crate::structure::{
    Finding, LayoutComparison, LayoutError, PackingReport, ResolvedLayout, TypeDescriptorRecord,
    VPTR_NAME,
};
use colored::Colorize;
use indexmap::IndexMap;
use std::fmt::Write;

pub struct LayoutDisplay;

impl LayoutDisplay {
    pub fn render_layout(layout: &ResolvedLayout, descriptors: &[&TypeDescriptorRecord]) -> String {
        let mut out = String::new();
        let header = match layout.base() {
            Some(base) => format!("{} : {}", layout.class(), base),
            None => layout.class().to_string(),
        };
        let _ = writeln!(
            out,
            "{} {}",
            header.cyan().bold(),
            format!("(size 0x{:x}, align {})", layout.size().as_u64(), layout.alignment()).dimmed()
        );

        if let Some(slot) = layout.vtable() {
            let _ = writeln!(
                out,
                "  {:>6}  {:<24} {:<12} {}",
                format!("0x{:x}", slot.offset.as_u64()),
                VPTR_NAME.yellow(),
                "vptr",
                format!("{:?} via {}", layout.vtable_decision(), slot.introduced_by).dimmed()
            );
        }

        for field in layout.fields() {
            let name = if field.declared_in == layout.class() {
                field.name.green()
            } else {
                field.name.normal()
            };
            let _ = writeln!(
                out,
                "  {:>6}  {:<24} {:<12} {}",
                format!("0x{:x}", field.offset.as_u64()),
                name,
                field.type_name,
                if field.padding_before > 0 {
                    format!("+{} pad", field.padding_before).dimmed().to_string()
                } else {
                    String::new()
                }
            );
        }

        let packing = PackingReport::from_layout(layout);
        let _ = writeln!(
            out,
            "  {} {} bytes padding ({:.1}%), tail {}, suggested pack({})",
            "--".dimmed(),
            packing.total_padding,
            packing.padding_percentage(),
            layout.tail_padding(),
            packing.suggested_packing
        );

        for descriptor in descriptors {
            let _ = writeln!(out, "  {} {}", "dti".magenta(), descriptor);
        }
        out
    }

    pub fn render_findings(findings: &[Finding]) -> String {
        let mut out = String::new();
        for finding in findings {
            let _ = writeln!(out, "{} {}", "[!]".red(), finding);
        }
        out
    }

    pub fn render_failures(failures: &IndexMap<String, LayoutError>) -> String {
        let mut out = String::new();
        for (root, error) in failures {
            let _ = writeln!(out, "{} hierarchy {} dropped: {}", "[!]".red(), root.bold(), error);
        }
        out
    }

    pub fn render_comparison(comparison: &LayoutComparison) -> String {
        let mut out = String::new();
        if comparison.is_identical() {
            let _ = writeln!(out, "{} {} unchanged", "[+]".green(), comparison.class);
            return out;
        }
        let _ = writeln!(
            out,
            "{} {} ({:?})",
            "[~]".yellow(),
            comparison.class.bold(),
            comparison.max_severity()
        );
        for difference in &comparison.differences {
            let _ = writeln!(out, "    {}", difference);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::fixture::{sample_graph, SAMPLE_LEAF};
    use crate::structure::LayoutResolver;

    #[test]
    fn test_render_sample_leaf() {
        colored::control::set_override(false);
        let config = LayoutConfig::default();
        let graph = sample_graph(&config).unwrap();
        let resolved = LayoutResolver::new(config).unwrap().resolve(&graph);
        let text = LayoutDisplay::render_layout(
            resolved.layout(SAMPLE_LEAF).unwrap(),
            &graph.type_descriptors(SAMPLE_LEAF),
        );

        assert!(text.starts_with("cSetInfoOmBreakTarget : cSetInfoOm (size 0x78, align 8)"));
        assert!(text.contains("mBreakHitNum"));
        assert!(text.contains("cSetInfoOmBreakTarget::MyDTI : MtDTI"));
    }
}
