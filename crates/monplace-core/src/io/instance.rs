//! Instance file parsing.
//!
//! ```text
//! <n> <m>
//! <start> <end> | <node> <node> ...     (m lines, route index order)
//! ```

use std::path::Path;

use super::parse_indices;
use crate::error::{PlacementError, Result};
use crate::topology::{Route, Topology};

/// Parses an instance and builds its [`Topology`].
///
/// # Example
///
/// ```
/// use monplace_core::io::parse_instance;
///
/// let topology = parse_instance("3 2\n0 1 | 0 1\n1 2 | 1 2\n").unwrap();
/// assert_eq!(topology.symptoms(1), &[0, 1]);
/// ```
pub fn parse_instance(text: &str) -> Result<Topology> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| PlacementError::instance(Some(1), "missing header line"))?;
    let header = parse_indices(header, |reason| {
        PlacementError::instance(Some(header_line), reason)
    })?;
    let (n, m) = match header.as_slice() {
        [n, m] => (*n, *m),
        _ => {
            return Err(PlacementError::instance(
                Some(header_line),
                "header must be '<nodes> <routes>'",
            ))
        }
    };
    if n == 0 {
        return Err(PlacementError::instance(Some(header_line), "instance has no nodes"));
    }

    let mut routes = Vec::new();
    for index in 0..m {
        let (line_no, line) = lines.next().ok_or_else(|| {
            PlacementError::instance(
                Some(index + 2),
                format!("expected {} routes, found {}", m, index),
            )
        })?;
        routes.push(parse_route(line, line_no, index, n)?);
    }

    if let Some((line_no, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(PlacementError::instance(
            Some(line_no),
            format!("unexpected content after {} routes", m),
        ));
    }

    // routes are range-checked above; an untagged failure belongs to the header
    let topology = Topology::build(n, routes).map_err(|e| match e {
        PlacementError::MalformedInstance { line: None, reason } => {
            PlacementError::instance(Some(header_line), reason)
        }
        other => other,
    })?;
    tracing::info!(
        event = "instance_loaded",
        node_count = topology.num_nodes(),
        route_count = topology.num_routes(),
    );
    Ok(topology)
}

/// Reads and parses an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Topology> {
    let text = std::fs::read_to_string(path)?;
    parse_instance(&text)
}

fn parse_route(line: &str, line_no: usize, index: usize, n: usize) -> Result<Route> {
    let malformed = |reason: String| PlacementError::instance(Some(line_no), reason);

    let (ends, nodes) = line
        .split_once('|')
        .ok_or_else(|| malformed("expected '<start> <end> | <nodes>'".to_string()))?;
    let (start, end) = match parse_indices(ends, malformed)?.as_slice() {
        [start, end] => (*start, *end),
        _ => return Err(malformed("route needs exactly two endpoints".to_string())),
    };
    let nodes = parse_indices(nodes, malformed)?;

    if let Some(&bad) = [start, end].iter().chain(nodes.iter()).find(|&&v| v >= n) {
        return Err(malformed(format!("node {} outside 0..{}", bad, n)));
    }
    Ok(Route::new(start, end, nodes, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let topology = parse_instance("3 2\n0 1 | 0 1\n1 2 | 1 2\n").unwrap();
        assert_eq!(topology.num_nodes(), 3);
        assert_eq!(topology.all_symptoms(), &[vec![0], vec![0, 1], vec![1]]);
        assert_eq!(topology.route(1).unwrap().start(), 1);
        assert_eq!(topology.route(1).unwrap().end(), 2);
    }

    #[test]
    fn test_trailing_blank_lines_and_spaces() {
        let topology = parse_instance("4 1\n0 3 | 0 1 2 3 \n\n").unwrap();
        assert_eq!(topology.route(0).unwrap().nodes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_route_without_nodes() {
        let topology = parse_instance("2 1\n0 1 |\n").unwrap();
        assert!(topology.route(0).unwrap().nodes().is_empty());
    }

    #[test]
    fn test_errors_report_line() {
        let cases = [
            ("", 1),
            ("3\n", 1),
            ("0 0\n", 1),
            ("3 2\n0 1 | 0 1\n", 3),
            ("3 1\n0 1 0 1\n", 2),
            ("3 1\n0 | 0 1\n", 2),
            ("3 1\n0 1 | 0 x\n", 2),
            ("3 1\n0 1 | 0 -1\n", 2),
            ("3 1\n0 4 | 0\n", 2),
            ("3 1\n0 1 | 0 1\n1 2 | 1 2\n", 3),
        ];
        for (text, expected) in cases {
            match parse_instance(text) {
                Err(PlacementError::MalformedInstance { line, .. }) => {
                    assert_eq!(line, Some(expected), "input {:?}", text)
                }
                other => panic!("input {:?}: expected MalformedInstance, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_oversized_header_is_rejected() {
        // route count far beyond the lines present
        match parse_instance("3 18446744073709551615\n0 1 | 0 1\n") {
            Err(PlacementError::MalformedInstance { line, .. }) => assert_eq!(line, Some(3)),
            other => panic!("expected MalformedInstance, got {:?}", other),
        }
        // node count that cannot be allocated
        match parse_instance("18446744073709551615 0\n") {
            Err(PlacementError::MalformedInstance { line, .. }) => assert_eq!(line, Some(1)),
            other => panic!("expected MalformedInstance, got {:?}", other),
        }
    }

    #[test]
    fn test_read_instance_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.routes");
        std::fs::write(&path, "3 2\n0 1 | 0 1\n1 2 | 1 2\n").unwrap();
        assert_eq!(read_instance(&path).unwrap().num_routes(), 2);
        assert!(matches!(
            read_instance(dir.path().join("missing.routes")),
            Err(PlacementError::Io(_))
        ));
    }
}
