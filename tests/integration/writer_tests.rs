//! Frame stack writing and NeXus export tests.
//!
//! Tests verify:
//! - A staged acquisition resolves back frame by frame through the registry
//! - The exported `.nxs` file links to the same frames
//! - Export follows the root map and skips non-stack resources

use ndarray::Array2;

use germ_frames::{
    export_resource, nexus_path, DatumDocument, DetectorParameters, DetectorValue,
    FrameStackWriter, Hdf5FrameReader, HandlerRegistry, ResourceDocument, RootMap,
    StackAcquisition, DATASET_PATH,
};

use super::test_utils::{frame_stack, write_json};

fn detector_parameters() -> DetectorParameters {
    [
        ("count_time", DetectorValue::Float(1.0)),
        ("gain", DetectorValue::Text("Low".to_string())),
        ("shaping_time", DetectorValue::Text("2 us".to_string())),
        ("hv_bias", DetectorValue::Integer(-400)),
        ("voltage", DetectorValue::Float(3.3)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

// =============================================================================
// Acquisition Round Trip
// =============================================================================

#[test]
fn test_acquisition_resolves_through_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("2024/01/31")).unwrap();
    let stack = frame_stack(4, 3, 5);

    let mut acquisition =
        StackAcquisition::stage(dir.path(), "2024/01/31/run.h5", "res-1", (3, 5)).unwrap();
    let datums: Vec<DatumDocument> = stack
        .outer_iter()
        .map(|frame| acquisition.trigger(frame).unwrap())
        .collect();
    let resource = acquisition.unstage().unwrap();

    // Documents survive a trip through JSON files
    let resource_file = dir.path().join("resource.json");
    write_json(&resource_file, &serde_json::to_value(&resource).unwrap());
    let resource = ResourceDocument::from_json_file(&resource_file).unwrap();

    let registry = HandlerRegistry::new();
    for (i, datum) in datums.iter().enumerate() {
        let datum_file = dir.path().join(format!("datum-{i}.json"));
        write_json(&datum_file, &serde_json::to_value(datum).unwrap());
        let datum = DatumDocument::from_json_file(&datum_file).unwrap();

        let frame = registry.resolve(&resource, &datum, &RootMap::new()).unwrap();
        assert_eq!(
            frame.into_array::<f32>().unwrap(),
            stack.index_axis(ndarray::Axis(0), i).into_dyn()
        );
    }
}

#[test]
fn test_stage_refuses_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("run.h5"), b"earlier run").unwrap();

    assert!(StackAcquisition::stage(dir.path(), "run.h5", "res-2", (2, 2)).is_err());
}

// =============================================================================
// NeXus Export
// =============================================================================

#[test]
fn test_nexus_link_resolves_to_stack_frames() {
    let dir = tempfile::tempdir().unwrap();
    let stack = frame_stack(3, 2, 2);

    let mut acquisition = StackAcquisition::stage(dir.path(), "run.h5", "res-3", (2, 2)).unwrap();
    for frame in stack.outer_iter() {
        acquisition.trigger(frame).unwrap();
    }
    let resource = acquisition.unstage().unwrap();

    let nexus = export_resource(&resource, &RootMap::new(), &detector_parameters())
        .unwrap()
        .unwrap();
    assert_eq!(nexus, dir.path().join("run.nxs"));

    let through_link = Hdf5FrameReader::new(&nexus);
    let direct = Hdf5FrameReader::new(resource.full_path());
    for i in 0..3 {
        assert_eq!(through_link.read(i).unwrap(), direct.read(i).unwrap());
    }
    assert!(through_link.read(3).is_err());

    let file = hdf5::File::open(&nexus).unwrap();
    let detector = file.group("entry/instrument/detector").unwrap();
    let mut names = detector.member_names().unwrap();
    names.sort();
    assert_eq!(
        names,
        vec!["count_time", "gain", "hv_bias", "shaping_time", "voltage"]
    );
    assert_eq!(file.dataset(DATASET_PATH).unwrap().shape(), vec![3, 2, 2]);
}

#[test]
fn test_nexus_export_follows_root_map() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = FrameStackWriter::create(dir.path().join("run.h5"), (2, 2)).unwrap();
    writer
        .append_frame(Array2::from_elem((2, 2), 7.0f32).view())
        .unwrap();
    writer.finish().unwrap();

    let resource = ResourceDocument::new("AD_HDF5_GERM", "/nsls2/data/germ", "run.h5");
    let map = RootMap::new().with("/nsls2/data/germ", dir.path());

    let nexus = export_resource(&resource, &map, &DetectorParameters::new())
        .unwrap()
        .unwrap();
    assert_eq!(nexus, nexus_path(&dir.path().join("run.h5")));

    let frame = Hdf5FrameReader::new(&nexus).read(0).unwrap();
    assert_eq!(frame.downcast_ref::<f32>().unwrap()[[1, 1]], 7.0);
}

#[test]
fn test_nexus_export_skips_tiff_resource() {
    let dir = tempfile::tempdir().unwrap();
    let resource = ResourceDocument::new("AD_TIFF_GERM", dir.path(), "image.tiff");

    let exported = export_resource(&resource, &RootMap::new(), &detector_parameters()).unwrap();
    assert!(exported.is_none());
    assert!(!dir.path().join("image.nxs").exists());
}
