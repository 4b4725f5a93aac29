//! The sequencer: section order, header lines, and separators.
//!
//! Emits the diagram sections in fixed order (module tree, augments,
//! rpcs, notifications, groupings, yang-data), each as one keyword line
//! plus a forest rendered by the walker. Body sections are preceded by two
//! newline bytes (closing the previous line and leaving one blank
//! separator line); absent sections are skipped entirely, separators
//! included. Body path arguments wrap at `/` boundaries, aligned under the
//! path's start column; top arguments never split.

use std::io;

use log::{debug, warn};

use treeline_core::{
    accessor::SchemaCursor,
    descriptor::KeywordStatement,
    sink::{Sink, write_spaces},
    wrapper::Wrapper,
};

use crate::{config::RenderConfig, walker::TreeWalker};

/// Renders every enabled section of the tree behind `cursor`.
pub fn render_sections(
    cursor: &mut dyn SchemaCursor,
    config: &RenderConfig,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    let max_len = config.max_line_length().unwrap_or(usize::MAX);
    let sections = config.sections();
    let mut separate = false;

    if sections.module {
        let statement = cursor.to_module_section();
        write_keyword_line(&statement, max_len, sink)?;
        render_section_forest(cursor, &statement, Wrapper::top(), max_len, config, sink)?;
        separate = true;
    }

    if sections.augment {
        while let Some(statement) = cursor.to_next_augment() {
            open_section(&mut separate, sink)?;
            write_keyword_line(&statement, max_len, sink)?;
            render_section_forest(cursor, &statement, Wrapper::body(), max_len, config, sink)?;
        }
    }

    if sections.rpcs {
        if let Some(statement) = cursor.to_rpcs_section() {
            open_section(&mut separate, sink)?;
            write_keyword_line(&statement, max_len, sink)?;
            render_section_forest(cursor, &statement, Wrapper::body(), max_len, config, sink)?;
        }
    }

    if sections.notifications {
        if let Some(statement) = cursor.to_notifications_section() {
            open_section(&mut separate, sink)?;
            write_keyword_line(&statement, max_len, sink)?;
            render_section_forest(cursor, &statement, Wrapper::body(), max_len, config, sink)?;
        }
    }

    if sections.grouping {
        while let Some(statement) = cursor.to_next_grouping() {
            open_section(&mut separate, sink)?;
            write_keyword_line(&statement, max_len, sink)?;
            render_section_forest(cursor, &statement, Wrapper::body(), max_len, config, sink)?;
        }
    }

    if sections.yang_data {
        while let Some(statement) = cursor.to_next_yang_data() {
            open_section(&mut separate, sink)?;
            write_keyword_line(&statement, max_len, sink)?;
            render_section_forest(cursor, &statement, Wrapper::body(), max_len, config, sink)?;
        }
    }

    if separate {
        sink.put("\n")?;
    }
    Ok(())
}

/// Separates a body section from whatever came before it.
fn open_section(separate: &mut bool, sink: &mut dyn Sink) -> io::Result<()> {
    if *separate {
        sink.put("\n\n")?;
    }
    *separate = true;
    Ok(())
}

fn render_section_forest(
    cursor: &mut dyn SchemaCursor,
    statement: &KeywordStatement,
    wrapper: Wrapper,
    max_len: usize,
    config: &RenderConfig,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    if cursor.current_node().is_none() {
        return Ok(());
    }
    let mut walker = TreeWalker::new(cursor, max_len);
    walker.render_family_tree(wrapper, sink)?;
    let line_breaks = walker.line_breaks();
    debug!(
        section = statement.keyword.as_str(),
        line_breaks = line_breaks;
        "section rendered"
    );
    if let Some(limit) = config.max_line_breaks() {
        if line_breaks > limit {
            warn!(
                section = statement.keyword.as_str(),
                line_breaks = line_breaks,
                limit = limit;
                "section exceeds the advisory linebreak limit"
            );
        }
    }
    Ok(())
}

/// Writes a section header: `module: <name>` for top keywords,
/// `  <keyword> <path>:` for body keywords (`  rpcs:` when the argument is
/// empty).
fn write_keyword_line(
    statement: &KeywordStatement,
    max_len: usize,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    let keyword = statement.keyword.as_str();
    if statement.keyword.is_top() {
        sink.put(keyword)?;
        sink.put(": ")?;
        sink.put(&statement.argument)
    } else {
        sink.put("  ")?;
        sink.put(keyword)?;
        if !statement.argument.is_empty() {
            sink.put(" ")?;
            let start_col = 2 + keyword.len() + 1;
            write_wrapped_path(&statement.argument, start_col, max_len, sink)?;
        }
        sink.put(":")
    }
}

/// Writes a path, breaking before `/` boundaries when the line would
/// overflow. Continuations are aligned under the path's start column; the
/// first segment never breaks, and a segment longer than the limit prints
/// past it.
fn write_wrapped_path(
    path: &str,
    start_col: usize,
    max_len: usize,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    let mut column = start_col;
    let mut first = true;
    for segment in path_segments(path) {
        if !first && column + segment.len() > max_len {
            sink.put("\n")?;
            write_spaces(sink, start_col)?;
            column = start_col;
        }
        sink.put(segment)?;
        column += segment.len();
        first = false;
    }
    Ok(())
}

/// Splits a path into break-safe segments, each beginning with `/` except
/// a leading non-slash piece.
fn path_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (index, _) in path.match_indices('/') {
        if index > start {
            segments.push(&path[start..index]);
            start = index;
        }
    }
    segments.push(&path[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use treeline_core::{descriptor::SectionKeyword, sink::StringSink};

    use super::*;

    fn keyword_line(statement: &KeywordStatement, max_len: usize) -> String {
        let mut sink = StringSink::new();
        write_keyword_line(statement, max_len, &mut sink).unwrap();
        sink.into_string()
    }

    #[test]
    fn test_module_line_never_splits() {
        let statement = KeywordStatement::new(
            SectionKeyword::Module,
            "a-very-long-module-name-that-overflows",
        );
        assert_eq!(
            keyword_line(&statement, 10),
            "module: a-very-long-module-name-that-overflows"
        );
    }

    #[test]
    fn test_empty_body_argument() {
        let statement = KeywordStatement::new(SectionKeyword::Rpcs, "");
        assert_eq!(keyword_line(&statement, 72), "  rpcs:");
    }

    #[test]
    fn test_body_path_on_one_line() {
        let statement = KeywordStatement::new(SectionKeyword::Augment, "/sys:system/sys:dns");
        assert_eq!(keyword_line(&statement, 72), "  augment /sys:system/sys:dns:");
    }

    #[test]
    fn test_body_path_splits_per_segment() {
        let statement = KeywordStatement::new(SectionKeyword::Augment, "/a:b/c:d/e:f/g:h/i:j");
        // "  augment " occupies the first ten columns, so every following
        // segment overflows a ten-column line and wraps to the path column.
        assert_eq!(
            keyword_line(&statement, 10),
            "  augment /a:b\n          /c:d\n          /e:f\n          /g:h\n          /i:j:"
        );
    }

    #[test]
    fn test_short_segments_share_a_line() {
        let statement = KeywordStatement::new(SectionKeyword::Augment, "/a:b/c:d/e:f");
        assert_eq!(
            keyword_line(&statement, 18),
            "  augment /a:b/c:d\n          /e:f:"
        );
    }

    #[test]
    fn test_path_segments_split_points() {
        assert_eq!(path_segments("/a:b/c"), vec!["/a:b", "/c"]);
        assert_eq!(path_segments("name"), vec!["name"]);
        assert_eq!(path_segments("a/b"), vec!["a", "/b"]);
        assert_eq!(path_segments("/x"), vec!["/x"]);
    }
}
