#[cfg(test)]
mod tests {
    use crate::constraint::Constraint;
    use crate::error::SnapolyError;
    use crate::graph::ring_graph::{assemble_rings, NodeKey, RingGraph};
    use geo_types::Coord;

    fn seg(a: (f64, f64), b: (f64, f64), id: &str) -> Constraint {
        Constraint::new(Coord::from(a), Coord::from(b), id)
    }

    fn square(x0: f64, y0: f64, size: f64, id: &str) -> Vec<Constraint> {
        let (x1, y1) = (x0 + size, y0 + size);
        vec![
            seg((x0, y0), (x1, y0), id),
            seg((x1, y0), (x1, y1), id),
            seg((x1, y1), (x0, y1), id),
            seg((x0, y1), (x0, y0), id),
        ]
    }

    #[test]
    fn test_graph_construction() {
        let graph = RingGraph::from_constraints(square(0.0, 0.0, 10.0, "a")).unwrap();

        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.edges.len(), 4);
        let corner = graph.node_at(Coord { x: 0.0, y: 0.0 }).unwrap();
        assert_eq!(corner.degree(), 2);
        assert!(graph.check_degrees().is_ok());
    }

    #[test]
    fn test_negative_zero_shares_a_node() {
        assert_eq!(NodeKey::from(Coord { x: -0.0, y: 1.0 }), NodeKey::from(Coord { x: 0.0, y: 1.0 }));
        assert_ne!(NodeKey::from(Coord { x: 1e-12, y: 1.0 }), NodeKey::from(Coord { x: 0.0, y: 1.0 }));
    }

    #[test]
    fn test_segments_out_of_order_and_reversed() {
        let constraints = vec![
            seg((10.0, 10.0), (10.0, 0.0), "a"),
            seg((0.0, 10.0), (0.0, 0.0), "a"),
            seg((0.0, 0.0), (10.0, 0.0), "a"),
            seg((0.0, 10.0), (10.0, 10.0), "a"),
        ];
        let rings = assemble_rings(constraints).unwrap();
        assert_eq!(rings.len(), 1);
        let ring = &rings[0].ring;
        assert_eq!(ring.vertex_count(), 4);
        assert_eq!(ring.coords().first(), ring.coords().last());
        assert_eq!(rings[0].feature_id, "a");
    }

    #[test]
    fn test_every_segment_used_once() {
        let mut constraints = square(0.0, 0.0, 10.0, "outer");
        constraints.extend(square(2.0, 2.0, 3.0, "inner"));
        constraints.extend(square(20.0, 0.0, 1.0, "far"));
        let input = constraints.clone();

        let rings = assemble_rings(constraints).unwrap();
        assert_eq!(rings.len(), 3);

        let mut walked: Vec<Constraint> = Vec::new();
        for r in &rings {
            for line in r.ring.line_string().lines() {
                walked.push(Constraint { line, feature_id: r.feature_id.clone() });
            }
        }
        assert_eq!(walked.len(), input.len());
        for c in &input {
            let hits = walked.iter().filter(|w| w.same_segment(c)).count();
            assert_eq!(hits, 1, "segment {:?} covered {} times", c.line, hits);
        }
    }

    #[test]
    fn test_dangling_endpoint() {
        let mut constraints = square(0.0, 0.0, 10.0, "a");
        constraints.pop();
        let err = assemble_rings(constraints).unwrap_err();
        match err {
            SnapolyError::MalformedTopology(msg) => assert!(msg.contains("dangling"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_branching_vertex() {
        let mut constraints = square(0.0, 0.0, 10.0, "a");
        constraints.push(seg((0.0, 0.0), (-5.0, -5.0), "a"));
        constraints.push(seg((-5.0, -5.0), (-5.0, 0.0), "a"));
        constraints.push(seg((-5.0, 0.0), (0.0, 0.0), "a"));
        let err = assemble_rings(constraints).unwrap_err();
        match err {
            SnapolyError::MalformedTopology(msg) => assert!(msg.contains("branching"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_zero_length_segment() {
        let constraints = vec![seg((1.0, 1.0), (1.0, 1.0), "a")];
        assert!(matches!(assemble_rings(constraints), Err(SnapolyError::MalformedTopology(_))));
    }

    #[test]
    fn test_doubled_segment_is_not_a_ring() {
        let constraints = vec![seg((0.0, 0.0), (1.0, 0.0), "a"), seg((1.0, 0.0), (0.0, 0.0), "a")];
        assert!(matches!(assemble_rings(constraints), Err(SnapolyError::MalformedTopology(_))));
    }

    #[test]
    fn test_majority_feature_id() {
        let mut constraints = square(0.0, 0.0, 1.0, "b");
        constraints[0].feature_id = "a".to_string();
        let rings = assemble_rings(constraints).unwrap();
        assert_eq!(rings[0].feature_id, "b");

        let mut tied = square(0.0, 0.0, 1.0, "z");
        tied[0].feature_id = "m".to_string();
        tied[1].feature_id = "m".to_string();
        let rings = assemble_rings(tied).unwrap();
        assert_eq!(rings[0].feature_id, "m");
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble_rings(Vec::new()).unwrap().is_empty());
    }
}
