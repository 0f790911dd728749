//! End-to-end resolution tests.
//!
//! Tests verify:
//! - Resource/datum documents on disk resolve to the same frame as a direct read
//! - Root maps relocate resources
//! - Container detection agrees with the files the readers consume

use serde_json::json;

use germ_frames::{
    detect_container, ContainerKind, DatumDocument, DatumKwargs, FormatError, FormatSpec,
    FrameError, Hdf5FrameReader, HandlerRegistry, ResourceDocument, RootMap, TiffFrameReader,
};

use super::test_utils::{
    frame_stack, gray16_pattern, write_frame_stack, write_gray16_tiff, write_json,
};

// =============================================================================
// Resolution from Documents
// =============================================================================

#[test]
fn test_resolve_hdf5_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("2024/01")).unwrap();
    let data = dir.path().join("2024/01/stack.h5");
    write_frame_stack(&data, &frame_stack(3, 2, 4).into_dyn());

    let resource_path = dir.path().join("resource.json");
    write_json(
        &resource_path,
        &json!({
            "spec": "AD_HDF5_GERM",
            "root": dir.path(),
            "resource_path": "2024/01/stack.h5",
            "resource_kwargs": {},
            "uid": "res-1",
            "path_semantics": "posix"
        }),
    );
    let datum_path = dir.path().join("datum.json");
    write_json(
        &datum_path,
        &json!({"datum_id": "res-1/2", "resource": "res-1", "datum_kwargs": {"frame": 2}}),
    );

    let resource = ResourceDocument::from_json_file(&resource_path).unwrap();
    let datum = DatumDocument::from_json_file(&datum_path).unwrap();

    let registry = HandlerRegistry::new();
    let frame = registry.resolve(&resource, &datum, &RootMap::new()).unwrap();

    assert_eq!(frame, Hdf5FrameReader::new(&data).read(2).unwrap());
}

#[test]
fn test_resolve_tiff_documents() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("image.tiff");
    write_gray16_tiff(&data, 6, 2, &gray16_pattern(6, 2));

    let resource = ResourceDocument::new("AD_TIFF_GERM", dir.path(), "image.tiff").with_uid("r");
    let datum = DatumDocument::new("r", 0, DatumKwargs::none());

    let frame = HandlerRegistry::new()
        .resolve(&resource, &datum, &RootMap::new())
        .unwrap();

    assert_eq!(frame.shape(), &[1, 2, 6]);
    assert_eq!(frame, TiffFrameReader::new(&data).read().unwrap());
}

#[test]
fn test_resolve_each_datum_of_a_stack() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("stack.h5");
    let stack = frame_stack(3, 2, 2);
    write_frame_stack(&data, &stack.clone().into_dyn());

    let registry = HandlerRegistry::new();
    let resource = ResourceDocument::new("AD_HDF5_GERM", dir.path(), "stack.h5").with_uid("r");

    for i in 0..3 {
        let datum = DatumDocument::new("r", i, DatumKwargs::frame(i));
        let frame = registry.resolve(&resource, &datum, &RootMap::new()).unwrap();
        let array = frame.downcast_ref::<f32>().unwrap();
        assert_eq!(array[[0, 0]], stack[[i, 0, 0]]);
    }
}

#[test]
fn test_resolve_relocated_root() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("stack.h5");
    write_frame_stack(&data, &frame_stack(2, 2, 2).into_dyn());

    let registry = HandlerRegistry::new();
    let resource = ResourceDocument::new("AD_HDF5_GERM", "/nsls2/data/germ", "stack.h5");
    let datum = DatumDocument::new("r", 1, DatumKwargs::frame(1));

    // The recorded root does not exist here
    assert!(registry.resolve(&resource, &datum, &RootMap::new()).is_err());

    let map = RootMap::new().with("/nsls2/data/germ", dir.path());
    let frame = registry.resolve(&resource, &datum, &map).unwrap();
    assert_eq!(frame.shape(), &[2, 2]);
}

#[test]
fn test_resolve_hdf5_without_frame() {
    let dir = tempfile::tempdir().unwrap();
    write_frame_stack(&dir.path().join("stack.h5"), &frame_stack(1, 2, 2).into_dyn());

    let resource = ResourceDocument::new("AD_HDF5_GERM", dir.path(), "stack.h5");
    let datum = DatumDocument::new("r", 0, DatumKwargs::none());

    let err = HandlerRegistry::new()
        .resolve(&resource, &datum, &RootMap::new())
        .unwrap_err();
    assert!(matches!(err, FrameError::MissingArgument { .. }));
}

#[test]
fn test_resolve_unknown_spec() {
    let resource = ResourceDocument::new("AD_EIGER", "/data", "a.h5");
    let datum = DatumDocument::new("r", 0, DatumKwargs::frame(0));

    let err = HandlerRegistry::new()
        .resolve(&resource, &datum, &RootMap::new())
        .unwrap_err();
    assert!(matches!(err, FrameError::UnknownSpec(ref s) if s == "AD_EIGER"));
}

#[test]
fn test_datum_with_unknown_argument_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datum.json");
    write_json(
        &path,
        &json!({"datum_id": "r/0", "resource": "r", "datum_kwargs": {"point_number": 0}}),
    );

    assert!(DatumDocument::from_json_file(&path).is_err());
}

// =============================================================================
// Container Detection
// =============================================================================

#[test]
fn test_detect_written_files() {
    let dir = tempfile::tempdir().unwrap();
    let tiff = dir.path().join("image.tiff");
    let h5 = dir.path().join("stack.h5");
    write_gray16_tiff(&tiff, 2, 2, &gray16_pattern(2, 2));
    write_frame_stack(&h5, &frame_stack(1, 2, 2).into_dyn());

    let kind = detect_container(&tiff).unwrap();
    assert_eq!(kind, ContainerKind::Tiff);
    assert_eq!(kind.suggested_spec(), FormatSpec::AdTiffGerm);

    let kind = detect_container(&h5).unwrap();
    assert_eq!(kind, ContainerKind::Hdf5);
    assert_eq!(kind.suggested_spec(), FormatSpec::AdHdf5Germ);
}

#[test]
fn test_detect_unrecognized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"neither tiff nor hdf5").unwrap();

    assert!(matches!(
        detect_container(&path),
        Err(FormatError::UnrecognizedContainer { .. })
    ));
    assert!(matches!(
        detect_container(dir.path().join("missing")),
        Err(FormatError::Io(_))
    ));
}

#[test]
fn test_suggested_spec_is_registered() {
    let registry = HandlerRegistry::new();
    for kind in [ContainerKind::Tiff, ContainerKind::BigTiff, ContainerKind::Hdf5] {
        assert!(registry.contains(kind.suggested_spec().as_str()));
    }
}
