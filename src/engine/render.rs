use std::collections::HashSet;
use std::fmt::Write;

use crate::engine::cochange::PairWeights;
use crate::models::graph::Edge;

pub const DEFAULT_MIN_OCCURRENCE: u32 = 3;
pub const DEFAULT_MAX_WIDTH: u32 = 10;

/// Edge filter and pen-width scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Inclusive lower bound on a pair's count
    pub min_occurrence: u32,
    /// Pen width given to the heaviest pair
    pub max_width: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_occurrence: DEFAULT_MIN_OCCURRENCE,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

/// Pick one edge per unordered pair whose count reaches the threshold.
///
/// Entries are visited in lexicographic order, so each edge is emitted with
/// its endpoints in ascending order and the output is stable across runs.
pub fn select_edges(weights: &PairWeights, opts: &RenderOptions) -> Vec<Edge> {
    let max = weights.max_weight();
    let mut entries: Vec<(&str, &str, u32)> = weights.iter().collect();
    entries.sort_unstable_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));

    let mut done: HashSet<(&str, &str)> = HashSet::new();
    let mut edges = Vec::new();

    for (f1, f2, count) in entries {
        if done.contains(&(f2, f1)) {
            continue;
        }
        done.insert((f1, f2));

        if count >= opts.min_occurrence {
            edges.push(Edge {
                file_a: f1.to_string(),
                file_b: f2.to_string(),
                weight: count,
                penwidth: penwidth(count, max, opts.max_width),
            });
        }
    }

    edges
}

fn penwidth(count: u32, max: u32, max_width: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(count) / f64::from(max) * f64::from(max_width)
}

/// Render edges as an undirected Graphviz graph.
pub fn render_dot(edges: &[Edge]) -> String {
    let mut out = String::from("graph G {\n");
    for edge in edges {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "  {} -- {} [weight={} penwidth={:.6}]",
            quote(&edge.file_a),
            quote(&edge.file_b),
            edge.weight,
            edge.penwidth
        );
    }
    out.push_str("}\n");
    out
}

/// Double-quote a path, escaping characters that would end or corrupt the ID.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commit::CommitRecord;

    fn weights(commits: &[&[&str]]) -> PairWeights {
        commits
            .iter()
            .enumerate()
            .map(|(i, files)| CommitRecord {
                id: format!("c{i}"),
                files: files.iter().map(|f| f.to_string()).collect(),
            })
            .collect()
    }

    fn opts(min_occurrence: u32, max_width: u32) -> RenderOptions {
        RenderOptions {
            min_occurrence,
            max_width,
        }
    }

    #[test]
    fn single_pair_gets_full_width() {
        let w = weights(&[&["a.txt", "b.txt"]]);
        let edges = select_edges(&w, &opts(1, 10));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].file_a, "a.txt");
        assert_eq!(edges[0].file_b, "b.txt");
        assert_eq!(edges[0].weight, 1);
        assert_eq!(edges[0].penwidth, 10.0);
        assert_eq!(
            render_dot(&edges),
            "graph G {\n  \"a.txt\" -- \"b.txt\" [weight=1 penwidth=10.000000]\n}\n"
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let w = weights(&[&["a.txt", "b.txt"], &["a.txt", "b.txt"], &["a.txt", "c.txt"]]);
        let edges = select_edges(&w, &opts(2, 10));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].weight, 2);
        assert_eq!((edges[0].file_a.as_str(), edges[0].file_b.as_str()), ("a.txt", "b.txt"));
    }

    #[test]
    fn each_pair_emitted_once() {
        let w = weights(&[&["c", "b", "a"], &["b", "a"]]);
        let edges = select_edges(&w, &opts(1, 10));
        let pairs: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.file_a.as_str(), e.file_b.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "c")]);
    }

    #[test]
    fn penwidth_is_monotonic_and_scaled() {
        let w = weights(&[&["a", "b", "c"], &["a", "b"], &["a", "b"], &["a", "d"]]);
        let edges = select_edges(&w, &opts(1, 6));
        let ab = edges.iter().find(|e| e.file_a == "a" && e.file_b == "b").unwrap();
        let ac = edges.iter().find(|e| e.file_a == "a" && e.file_b == "c").unwrap();
        assert_eq!(ab.weight, 3);
        assert_eq!(ab.penwidth, 6.0);
        assert!((ac.penwidth - 2.0).abs() < 1e-9);
        for x in &edges {
            for y in &edges {
                if x.weight < y.weight {
                    assert!(x.penwidth <= y.penwidth);
                }
            }
        }
    }

    #[test]
    fn fractional_penwidth_has_six_decimals() {
        let w = weights(&[&["a", "b"], &["a", "b"], &["a", "b"], &["a", "c"]]);
        let dot = render_dot(&select_edges(&w, &opts(1, 10)));
        assert!(dot.contains("\"a\" -- \"c\" [weight=1 penwidth=3.333333]"));
        assert!(dot.contains("\"a\" -- \"b\" [weight=3 penwidth=10.000000]"));
    }

    #[test]
    fn empty_table_renders_empty_graph() {
        let edges = select_edges(&PairWeights::new(), &RenderOptions::default());
        assert!(edges.is_empty());
        assert_eq!(render_dot(&edges), "graph G {\n}\n");
    }

    #[test]
    fn quoting_escapes_specials() {
        assert_eq!(quote("plain/path.rs"), "\"plain/path.rs\"");
        assert_eq!(quote("say \"hi\".txt"), "\"say \\\"hi\\\".txt\"");
        assert_eq!(quote("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(quote("tab\there"), "\"tab\\there\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\x07\"");
        assert_eq!(quote("日本語.md"), "\"日本語.md\"");
    }
}
