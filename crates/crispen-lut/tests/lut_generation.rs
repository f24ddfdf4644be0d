use crispen_lut::color::rgb_to_hsl;
use crispen_lut::lut::grid_axis;
use crispen_lut::{
    CubeArtifact, GenerateOptions, LutError, Pipeline, Preset, PresetCatalog, StepDescriptor,
    build_table, generate, generate_to_file,
};

const EPSILON: f64 = 1e-10;

const CATALOG: &str = r#"{
    "presets": {
        "portrait": {
            "title": "Portrait",
            "comments": ["Warm skin, soft highlights", "strength via --strength"],
            "pipeline": [
                {"type": "channel_rebalance", "r_gain": 1.04, "b_gain": 0.96},
                {"type": "exposure", "gamma": 0.92, "shadow_lift": 0.02},
                {"type": "black_crush", "threshold": 0.08, "crush_gamma": 1.8, "transition_end": 0.18},
                {"type": "hue_desaturate", "hue_center": 120, "hue_width": 30, "desaturate": 0.3, "hue_shift": 4, "scale_by_saturation": true},
                {"type": "skin_correction", "hue_center": 25, "hue_width": 25, "hue_shift": -4,
                 "lum_low": 0.2, "lum_high": 0.9, "adaptive_desaturate": 0.3},
                {"type": "shadow_saturation_boost", "lum_high": 0.3, "boost": 0.15},
                {"type": "skin_rolloff", "hue_center": 25, "hue_width": 25, "knee": 0.75, "amount": 0.8},
                {"type": "global_highlight_desaturate", "threshold": 0.85, "amount": 0.4}
            ]
        },
        "protected": {
            "title": "Protected",
            "pipeline": [
                {"type": "exposure", "gamma": 0.8},
                {"type": "skin_highlight", "hue_center": 25, "hue_width": 25,
                 "skin_knee": 0.7, "skin_desaturate": 0.2, "global_knee": 0.85},
                {"type": "highlight_protect", "knee": 0.8, "ceiling": 0.97}
            ]
        }
    }
}"#;

fn catalog() -> PresetCatalog {
    PresetCatalog::from_json_str(CATALOG).unwrap()
}

fn single_step(step: StepDescriptor) -> Preset {
    Preset {
        title: "Single step".into(),
        comments: Vec::new(),
        pipeline: vec![step],
    }
}

fn lattice_input(index: usize, size: u32) -> [f64; 3] {
    let n = size as usize;
    [
        grid_axis((index % n) as u32, size),
        grid_axis(((index / n) % n) as u32, size),
        grid_axis((index / (n * n)) as u32, size),
    ]
}

#[test]
fn test_every_entry_in_unit_range() {
    let catalog = catalog();
    for name in catalog.names() {
        for size in [2, 5, 17] {
            let options = GenerateOptions {
                size,
                strength: 1.0,
            };
            let artifact = generate(catalog.get(name).unwrap(), &options).unwrap();
            assert_eq!(artifact.table.len(), (size as usize).pow(3));
            for rgb in artifact.table.entries() {
                assert!(
                    rgb.iter().all(|c| (0.0..=1.0).contains(c)),
                    "{name} size {size}: {rgb:?}"
                );
            }
        }
    }
}

#[test]
fn test_zero_strength_identity() {
    let preset = catalog().get("portrait").unwrap().clone();
    let pipeline = preset.validate().unwrap();
    assert!(!pipeline.has_fixed_steps());

    let size = 9;
    let table = build_table(&pipeline, 0.0, size).unwrap();
    for (i, out) in table.entries().iter().enumerate() {
        let input = lattice_input(i, size);
        for c in 0..3 {
            assert!(
                (out[c] - input[c]).abs() <= EPSILON,
                "entry {i} channel {c}: {} vs {}",
                out[c],
                input[c]
            );
        }
    }
}

#[test]
fn test_zero_strength_with_highlight_protect_is_bounded() {
    let preset = catalog().get("protected").unwrap().clone();
    let pipeline = preset.validate().unwrap();
    assert!(pipeline.has_fixed_steps());

    let size = 9;
    let table = build_table(&pipeline, 0.0, size).unwrap();
    for (i, out) in table.entries().iter().enumerate() {
        let input = lattice_input(i, size);
        for c in 0..3 {
            assert!((out[c] - input[c]).abs() <= 0.5, "entry {i} channel {c}");
        }
    }
}

#[test]
fn test_repeated_generation_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let preset = catalog().get("portrait").unwrap().clone();
    let options = GenerateOptions {
        size: 17,
        strength: 0.8,
    };

    let first = dir.path().join("first.cube");
    let second = dir.path().join("second.cube");
    generate_to_file(&preset, &options, &first).unwrap();
    generate_to_file(&preset, &options, &second).unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn test_written_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portrait.cube");
    let preset = catalog().get("portrait").unwrap().clone();
    let options = GenerateOptions {
        size: 3,
        strength: 1.0,
    };
    generate_to_file(&preset, &options, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Warm skin, soft highlights");
    assert_eq!(lines[1], "# strength via --strength");
    assert_eq!(lines[2], "TITLE \"Portrait\"");
    assert_eq!(lines[3], "LUT_3D_SIZE 3");
    assert_eq!(lines[4], "");
    assert_eq!(lines.len(), 5 + 27);
    for row in &lines[5..] {
        let fields: Vec<&str> = row.split(' ').collect();
        assert_eq!(fields.len(), 3, "{row}");
        for field in fields {
            let (_, decimals) = field.split_once('.').unwrap();
            assert_eq!(decimals.len(), 6, "{row}");
            assert!(!field.starts_with('-'), "{row}");
        }
    }

    let parsed = CubeArtifact::load(&path).unwrap();
    assert_eq!(parsed.title, "Portrait");
    assert_eq!(parsed.table.size(), 3);
}

#[test]
fn test_mid_gray_exposure() {
    let preset = single_step(
        StepDescriptor::new("exposure")
            .with("gamma", 1.35)
            .with("shadow_lift", 0.0),
    );
    let options = GenerateOptions {
        size: 3,
        strength: 1.0,
    };
    let artifact = generate(&preset, &options).unwrap();

    let expected = 0.5_f64.powf(1.35);
    let gray = artifact.table.get(1, 1, 1);
    for (i, c) in gray.iter().enumerate() {
        assert!((c - expected).abs() < EPSILON, "channel {i}: {c} vs {expected}");
    }
}

#[test]
fn test_skin_correction_leaves_blue_alone() {
    let preset = single_step(
        StepDescriptor::new("skin_correction")
            .with("hue_center", 25.0)
            .with("hue_width", 25.0)
            .with("hue_shift", -8.0)
            .with("adaptive_desaturate", 0.5)
            .with("lum_low", 0.2)
            .with("lum_high", 0.9),
    );
    let options = GenerateOptions {
        size: 5,
        strength: 1.0,
    };
    let artifact = generate(&preset, &options).unwrap();
    assert_eq!(artifact.table.get(0, 0, 4), [0.0, 0.0, 1.0]);

    let pipeline = preset.validate().unwrap();
    assert_eq!(pipeline.evaluate([0.0, 0.0, 1.0], 1.0), [0.0, 0.0, 1.0]);
}

#[test]
fn test_black_crush_scenario() {
    let pipeline = Pipeline::from_descriptors(&[StepDescriptor::new("black_crush")
        .with("threshold", 0.12)
        .with("crush_gamma", 2.5)
        .with("transition_end", 0.25)])
    .unwrap();

    let size = 33;
    let table = build_table(&pipeline, 1.0, size).unwrap();
    let mut crushed = 0;
    for (i, out) in table.entries().iter().enumerate() {
        let input = lattice_input(i, size);
        let l_in = rgb_to_hsl(input).l;
        if l_in >= 0.25 {
            assert_eq!(*out, input, "entry {i} should be untouched");
        } else if l_in > 0.0 && l_in < 0.12 {
            let l_out = rgb_to_hsl(*out).l;
            assert!(l_out < l_in, "entry {i}: {l_out} !< {l_in}");
            crushed += 1;
        }
    }
    assert!(crushed > 0);
}

#[test]
fn test_configuration_errors_create_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions::default();

    let cases = [
        single_step(StepDescriptor::new("vignette").with("amount", 0.5)),
        single_step(StepDescriptor::new("exposure").with("shadow_lift", 0.1)),
        Preset {
            title: "Empty".into(),
            comments: Vec::new(),
            pipeline: Vec::new(),
        },
    ];
    for (i, preset) in cases.iter().enumerate() {
        let path = dir.path().join(format!("case{i}.cube"));
        let err = generate_to_file(preset, &options, &path).unwrap_err();
        assert!(err.is_configuration(), "case {i}: {err}");
        assert!(!path.exists(), "case {i} left a file behind");
    }

    let path = dir.path().join("tiny.cube");
    let tiny = GenerateOptions {
        size: 1,
        strength: 1.0,
    };
    let preset = catalog().get("portrait").unwrap().clone();
    assert!(matches!(
        generate_to_file(&preset, &tiny, &path),
        Err(LutError::InvalidGridSize(1))
    ));
    assert!(!path.exists());

    let huge = GenerateOptions {
        size: 3_000_000,
        strength: 1.0,
    };
    assert!(matches!(
        generate_to_file(&preset, &huge, &path),
        Err(LutError::InvalidGridSize(3_000_000))
    ));
    assert!(!path.exists());

    let mut titled = preset.clone();
    titled.title = "Warm\nLook".into();
    let err = generate_to_file(&titled, &options, &path).unwrap_err();
    assert!(matches!(err, LutError::InvalidTitle(_)));
    assert!(!path.exists());
}

#[test]
fn test_catalog_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG).unwrap();

    let catalog = PresetCatalog::load(&path).unwrap();
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["portrait", "protected"]);
    assert!(matches!(
        PresetCatalog::load(&dir.path().join("missing.json")),
        Err(LutError::Io(_))
    ));
}
