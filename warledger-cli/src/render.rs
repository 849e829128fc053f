//! Render an assembled report for the console or markdown.
//!
//! Renderers only project fields: the report arrives pre-sorted and
//! pre-rounded, and nothing here recomputes or reorders. Truncation of
//! ranking lists is the one rendering-layer decision, served by
//! `Rankings::truncated`.

use colored::Colorize;
use std::fmt::Write;

use warledger_engine::numbers::round_f64_to_i64;
use warledger_engine::{
    EventCategory, EventReport, Rankings, TopMemberItem, ViolatorItem, format_duration,
    format_event_time, format_number, format_rate,
};

/// Render a colored console report.
#[must_use]
pub fn render_console(report: &EventReport, top: usize) -> String {
    let mut out = String::new();
    let meta = &report.meta;
    let summary = &report.summary;

    let _ = writeln!(
        out,
        "{} {}",
        meta.name.bright_cyan().bold(),
        format!("[{}]", meta.category).dimmed()
    );
    let window = format_duration(meta.event_start, meta.event_end);
    if !window.is_empty() {
        let _ = writeln!(
            out,
            "{} {} ({window})",
            format_event_time(meta.event_start).dimmed(),
            "→".dimmed()
        );
    }

    match meta.category {
        EventCategory::Battle | EventCategory::Siege => {
            let _ = writeln!(
                out,
                "participation {} ({}/{} members, {} absent, {} new)",
                format_rate(summary.participation_rate).bold(),
                summary.participated_count,
                summary.total_members,
                summary.absent_count,
                summary.new_member_count
            );
        }
        EventCategory::Forbidden => {
            let compliance = summary.compliance_rate.unwrap_or(100.0);
            let _ = writeln!(
                out,
                "compliance {} ({} violators of {} members)",
                format_rate(compliance).bold(),
                summary.violator_count,
                summary.total_members
            );
        }
    }

    match meta.category {
        EventCategory::Battle => {
            let _ = writeln!(
                out,
                "total merit {}  avg {}",
                format_number(summary.total_merit).bold(),
                format_number(round_f64_to_i64(summary.avg_merit))
            );
            if let Some(mvp) = &summary.mvp {
                let _ = writeln!(
                    out,
                    "MVP {} ({})",
                    mvp.member_name.bright_yellow(),
                    format_number(mvp.score)
                );
            }
        }
        EventCategory::Siege => {
            let _ = writeln!(
                out,
                "contribution {}  assist {}",
                format_number(summary.total_contribution).bold(),
                format_number(summary.total_assist).bold()
            );
            if let Some(mvp) = &summary.contribution_mvp {
                let _ = writeln!(
                    out,
                    "contribution MVP {} ({})",
                    mvp.member_name.bright_yellow(),
                    format_number(mvp.score)
                );
            }
            if let Some(mvp) = &summary.assist_mvp {
                let _ = writeln!(
                    out,
                    "assist MVP {} ({})",
                    mvp.member_name.bright_yellow(),
                    format_number(mvp.score)
                );
            }
        }
        EventCategory::Forbidden => {}
    }

    if !report.group_stats.is_empty() {
        let _ = writeln!(out, "\n{}", "groups".cyan().bold());
        for group in &report.group_stats {
            let metric = match meta.category {
                EventCategory::Battle => format_number(group.total_merit),
                EventCategory::Siege => {
                    format_number(group.total_contribution + group.total_assist)
                }
                EventCategory::Forbidden => format!("{} violators", group.violator_count),
            };
            let _ = writeln!(
                out,
                "  {:<16} {:>10}  {}",
                group.group_name,
                metric,
                format_rate(group.participation_rate).dimmed()
            );
        }
    }

    render_rankings(&mut out, &report.rankings.truncated(top));

    if let Some(stats) = &report.box_plot {
        let _ = writeln!(
            out,
            "\nspread min {} · q1 {} · median {} · q3 {} · max {}",
            format_number(round_f64_to_i64(stats.min)),
            format_number(round_f64_to_i64(stats.q1)),
            format_number(round_f64_to_i64(stats.median)),
            format_number(round_f64_to_i64(stats.q3)),
            format_number(round_f64_to_i64(stats.max))
        );
    } else {
        let _ = writeln!(out, "\n{}", "no metric data for this event".dimmed());
    }

    out
}

fn render_rankings(out: &mut String, rankings: &Rankings) {
    match rankings {
        Rankings::Battle { top_members } => {
            render_top_list(out, "top merit", top_members);
        }
        Rankings::Siege {
            contributors,
            assisters,
        } => {
            render_top_list(out, "top contributors", contributors);
            render_top_list(out, "top assisters", assisters);
        }
        Rankings::Forbidden { violators } => {
            render_violators(out, violators);
        }
    }
}

fn render_top_list(out: &mut String, title: &str, items: &[TopMemberItem]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title.cyan().bold());
    for item in items {
        let group = item.group_name.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "  {:>2}. {:<16} {:>10}  {}",
            item.rank,
            item.member_name,
            format_number(item.score),
            group.dimmed()
        );
    }
}

fn render_violators(out: &mut String, violators: &[ViolatorItem]) {
    if violators.is_empty() {
        let _ = writeln!(out, "\n{}", "no violations recorded".green());
        return;
    }
    let _ = writeln!(out, "\n{}", "violators".red().bold());
    for item in violators {
        let group = item.group_name.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "  {:>2}. {:<16} +{:>9}  {}",
            item.rank,
            item.member_name,
            format_number(item.power_diff),
            group.dimmed()
        );
    }
}

/// Render a markdown report.
#[must_use]
pub fn render_markdown(report: &EventReport, top: usize) -> String {
    let mut out = String::new();
    let meta = &report.meta;
    let summary = &report.summary;

    let _ = writeln!(out, "# {} ({})\n", meta.name, meta.category);

    match meta.category {
        EventCategory::Battle | EventCategory::Siege => {
            let _ = writeln!(
                out,
                "- participation: **{}** ({}/{} members)",
                format_rate(summary.participation_rate),
                summary.participated_count,
                summary.total_members
            );
        }
        EventCategory::Forbidden => {
            let _ = writeln!(
                out,
                "- compliance: **{}** ({} violators)",
                format_rate(summary.compliance_rate.unwrap_or(100.0)),
                summary.violator_count
            );
        }
    }

    if !report.group_stats.is_empty() {
        let _ = writeln!(out, "\n## Groups\n");
        let _ = writeln!(out, "| group | members | rate | metric |");
        let _ = writeln!(out, "|---|---|---|---|");
        for group in &report.group_stats {
            let metric = match meta.category {
                EventCategory::Battle => format_number(group.total_merit),
                EventCategory::Siege => {
                    format_number(group.total_contribution + group.total_assist)
                }
                EventCategory::Forbidden => group.violator_count.to_string(),
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                group.group_name,
                group.member_count,
                format_rate(group.participation_rate),
                metric
            );
        }
    }

    match &report.rankings.truncated(top) {
        Rankings::Battle { top_members } => {
            markdown_top_table(&mut out, "Top merit", top_members);
        }
        Rankings::Siege {
            contributors,
            assisters,
        } => {
            markdown_top_table(&mut out, "Top contributors", contributors);
            markdown_top_table(&mut out, "Top assisters", assisters);
        }
        Rankings::Forbidden { violators } => {
            if !violators.is_empty() {
                let _ = writeln!(out, "\n## Violators\n");
                let _ = writeln!(out, "| # | member | power gain |");
                let _ = writeln!(out, "|---|---|---|");
                for item in violators {
                    let _ = writeln!(
                        out,
                        "| {} | {} | {} |",
                        item.rank,
                        item.member_name,
                        format_number(item.power_diff)
                    );
                }
            }
        }
    }

    out
}

fn markdown_top_table(out: &mut String, title: &str, items: &[TopMemberItem]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {title}\n");
    let _ = writeln!(out, "| # | member | score |");
    let _ = writeln!(out, "|---|---|---|");
    for item in items {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            item.rank,
            item.member_name,
            format_number(item.score)
        );
    }
}
