//! Summary tab: dump parameters and runtime statistics.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::query::SnapshotQuery;
use crate::tui::style::Styles;
use crate::util::{format_count, format_ns_timestamp, format_size};

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Styles::section_header()))
}

fn entry(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", label), Styles::dim()),
        Span::raw(value),
    ])
}

pub fn render_summary(frame: &mut Frame, area: Rect, query: &SnapshotQuery, scroll: u16) {
    let overview = query.describe();
    let params = overview.params;
    let stats = overview.stats;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(section("Snapshot"));
    lines.push(entry("Objects", format_count(overview.object_count as u64)));
    lines.push(entry(
        "Reachable",
        format_count(overview.reachable_count as u64),
    ));
    lines.push(entry("Garbage", format_count(overview.garbage_count as u64)));
    lines.push(entry("Roots", format_count(overview.root_count as u64)));
    lines.push(Line::default());

    lines.push(section("Dump Parameters"));
    lines.push(entry(
        "Endianness",
        if params.big_endian { "big" } else { "little" }.to_string(),
    ));
    lines.push(entry("Pointer Size", format!("{} bytes", params.ptr_size)));
    lines.push(entry("Heap Start", format!("{:#x}", params.heap_start)));
    lines.push(entry("Heap End", format!("{:#x}", params.heap_end)));
    lines.push(entry("Arch", params.arch.clone()));
    lines.push(entry(
        "Experiment",
        if params.go_experiment.is_empty() {
            "none".to_string()
        } else {
            params.go_experiment.clone()
        },
    ));
    lines.push(entry("Num CPU", params.ncpu.to_string()));
    lines.push(Line::default());

    lines.push(section("General Statistics"));
    lines.push(entry("Alloc", format_size(stats.alloc)));
    lines.push(entry("TotalAlloc", format_size(stats.total_alloc)));
    lines.push(entry("Sys", format_size(stats.sys)));
    lines.push(entry("Lookups", format_count(stats.lookups)));
    lines.push(entry("Mallocs", format_count(stats.mallocs)));
    lines.push(entry("Frees", format_count(stats.frees)));
    lines.push(Line::default());

    lines.push(section("Heap"));
    lines.push(entry("HeapAlloc", format_size(stats.heap_alloc)));
    lines.push(entry("HeapSys", format_size(stats.heap_sys)));
    lines.push(entry("HeapIdle", format_size(stats.heap_idle)));
    lines.push(entry("HeapInuse", format_size(stats.heap_inuse)));
    lines.push(entry("HeapReleased", format_size(stats.heap_released)));
    lines.push(entry("HeapObjects", format_count(stats.heap_objects)));
    lines.push(Line::default());

    lines.push(section("Allocator Internals"));
    lines.push(entry("StackInuse", format_size(stats.stack_inuse)));
    lines.push(entry("StackSys", format_size(stats.stack_sys)));
    lines.push(entry("MSpanInuse", format_size(stats.mspan_inuse)));
    lines.push(entry("MSpanSys", format_size(stats.mspan_sys)));
    lines.push(entry("MCacheInuse", format_size(stats.mcache_inuse)));
    lines.push(entry("MCacheSys", format_size(stats.mcache_sys)));
    lines.push(entry("BuckHashSys", format_size(stats.buck_hash_sys)));
    lines.push(entry("GCSys", format_size(stats.gc_sys)));
    lines.push(entry("OtherSys", format_size(stats.other_sys)));
    lines.push(Line::default());

    lines.push(section("Garbage Collector"));
    lines.push(entry("NextGC", format_size(stats.next_gc)));
    lines.push(entry("LastGC", format_ns_timestamp(stats.last_gc)));
    lines.push(entry(
        "PauseTotal",
        format!("{:.3} ms", stats.pause_total_ns as f64 / 1_000_000.0),
    ));
    lines.push(entry("NumGC", format_count(stats.num_gc)));

    let max_scroll = (lines.len() as u16).saturating_sub(area.height);
    let paragraph = Paragraph::new(lines).scroll((scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}
