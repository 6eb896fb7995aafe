#[cfg(test)]
mod tests {
    use crate::constraint::Constraint;
    use crate::error::{Result, SnapolyError};
    use crate::layer::{Layer, LayerProcessor, SourcePolygon};
    use crate::normalize::LayerOffset;
    use crate::ring::Ring;
    use crate::NestingRule;
    use geo::Area;
    use geo_types::{polygon, Coord, LineString};

    fn donut_layer(name: &str, x0: f64, y0: f64) -> Layer {
        let mut layer = Layer::new(name);
        layer.add_polygon(
            "100",
            polygon![
                exterior: [(x: x0, y: y0), (x: x0 + 10.0, y: y0), (x: x0 + 10.0, y: y0 + 10.0), (x: x0, y: y0 + 10.0)],
                interiors: [[(x: x0 + 2.0, y: y0 + 2.0), (x: x0 + 2.0, y: y0 + 8.0), (x: x0 + 8.0, y: y0 + 8.0), (x: x0 + 8.0, y: y0 + 2.0)]],
            ],
        );
        layer
    }

    #[test]
    fn test_layer_round_trip_normalized() {
        let out = LayerProcessor::new().process(donut_layer("buildings", 600_000.0, 5_000_000.0)).unwrap();
        assert_eq!(out.name, "buildings");
        assert_eq!(out.offset, LayerOffset { min_x: 600_000.0, min_y: 5_000_000.0 });
        assert_eq!(out.records.len(), 1);

        let record = &out.records[0];
        assert_eq!(record.feature_id, "100");
        assert_eq!(record.holes().len(), 1);
        assert!((record.polygon.unsigned_area() - 64.0).abs() < 1e-9);

        let expected = Ring::new(LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)])).unwrap();
        assert!(Ring::new(record.exterior().clone()).unwrap().same_shape(&expected));
    }

    #[test]
    fn test_layer_restores_source_frame() {
        let out = LayerProcessor::new()
            .with_restore_offset(true)
            .process(donut_layer("buildings", 600_000.0, 5_000_000.0))
            .unwrap();
        let exterior = out.records[0].exterior();
        assert!(exterior.0.contains(&Coord { x: 600_000.0, y: 5_000_000.0 }));
        assert!(exterior.0.contains(&Coord { x: 600_010.0, y: 5_000_010.0 }));
    }

    #[test]
    fn test_empty_layer_is_not_an_error() {
        let out = LayerProcessor::new().process(Layer::new("empty")).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.offset, LayerOffset::ZERO);
    }

    #[test]
    fn test_custom_constraint_source_failure_aborts_layer() {
        let dangling = |polys: &[SourcePolygon]| -> Result<Vec<Constraint>> {
            let mut all: Vec<Constraint> = polys
                .iter()
                .flat_map(|p| Constraint::from_polygon(&p.feature_id, &p.polygon))
                .collect();
            all.pop();
            Ok(all)
        };
        let err = LayerProcessor::with_source(dangling)
            .process(donut_layer("broken", 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, SnapolyError::MalformedTopology(_)));
    }

    #[test]
    fn test_layers_fail_independently() {
        let mut bad = Layer::new("bad");
        bad.add_polygon("1", polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)]);
        // Shares the corner (4, 4) with the first polygon.
        bad.add_polygon("2", polygon![(x: 4.0, y: 4.0), (x: 8.0, y: 4.0), (x: 8.0, y: 8.0), (x: 4.0, y: 8.0)]);

        let results = LayerProcessor::new().process_all(vec![
            donut_layer("a", 0.0, 0.0),
            bad,
            donut_layer("c", 50.0, 50.0),
        ]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SnapolyError::MalformedTopology(_))));
        assert_eq!(results[2].as_ref().unwrap().offset, LayerOffset { min_x: 50.0, min_y: 50.0 });
    }

    #[test]
    fn test_repeated_layer_name_rejected() {
        let results = LayerProcessor::new().process_all(vec![donut_layer("dup", 0.0, 0.0), donut_layer("dup", 1.0, 1.0)]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SnapolyError::OffsetReassigned(_))));
    }

    #[test]
    fn test_nested_island_with_single_level_rule() {
        let mut layer = donut_layer("nested", 0.0, 0.0);
        layer.add_polygon("200", polygon![(x: 4.0, y: 4.0), (x: 6.0, y: 4.0), (x: 6.0, y: 6.0), (x: 4.0, y: 6.0)]);

        let out = LayerProcessor::new().process(layer.clone()).unwrap();
        assert_eq!(out.records.len(), 2);
        assert!(out.records.iter().any(|r| r.feature_id == "200" && r.holes().is_empty()));

        let err = LayerProcessor::new()
            .with_nesting(NestingRule::SingleLevel)
            .process(layer)
            .unwrap_err();
        assert!(matches!(err, SnapolyError::UnsupportedNesting(_)));
    }
}
