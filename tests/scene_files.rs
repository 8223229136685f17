//! End-to-end tests driving whole scene files through the loader.

use sceneloader::keybind::KeyBindings;
use sceneloader::object::Shape;
use sceneloader::scene::Scene;

const CORNELL_ISH: &str = "\
# box-with-a-ball test scene
camera pinhole
    eye 0 2.5 8
    at 0 2.5 0
    up 0 1 0
    fovy 38.5
    res 640 480
end

light
    name Ceiling
    pos 0 4.9 0
    rgb 1 0.9 0.8
end

material lambertian
    name White
    dif 0.73 0.73 0.73
end

material lambertian
    name Red
    dif 0.65 0.05 0.05
end

object quad
    name Floor
    material White
    v0 -2.5 0 -2.5
    v1 2.5 0 -2.5
    v2 2.5 0 2.5
    v3 -2.5 0 2.5
end

object sphere
    material Red
    center 0 1 0
    radius 1
end

float exposure 1.0
int samples 16
bool shadows on
";

#[test]
fn test_full_scene_round_trip() {
    let mut scene = Scene::new();
    scene.load_str(CORNELL_ISH).unwrap();

    assert_eq!(scene.camera().fovy, 38.5);
    assert_eq!(scene.screen().width, 640);
    assert_eq!(scene.lights().len(), 1);
    assert_eq!(scene.light(0).unwrap().name.as_deref(), Some("Ceiling"));
    assert_eq!(scene.geometry().len(), 2);

    let floor = scene.object(scene.find_object("Floor").unwrap());
    assert_eq!(floor.material, scene.find_material("White"));

    let summary = scene.summary();
    // Built-in default material plus the two declared ones.
    assert_eq!(summary.materials, 3);
    assert_eq!(summary.floats, vec![("exposure".to_owned(), 1.0)]);
}

#[test]
fn test_unknown_block_does_not_derail_following_blocks() {
    let text = "\
camera pinhole
end

# a block type this loader has never heard of
fogvolume
    density 0.02
end

light
    pos 1 2 3
end
";
    let mut scene = Scene::new();
    scene.load_str(text).unwrap();
    assert_eq!(scene.lights().len(), 1);
    assert_eq!(scene.lights()[0].position, glam::Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_unknown_object_type_skips_its_whole_block() {
    // The unrecognized object holds a nested material block; the loader must
    // swallow both `end`s and still see the sphere after it.
    let text = "\
camera pinhole
end

object torus
    material lambertian
        dif 1 1 1
    end
    minor 0.25
end

object sphere
    radius 2
end
";
    let mut scene = Scene::new();
    scene.load_str(text).unwrap();
    assert_eq!(scene.geometry().len(), 1);
    match scene.object(scene.geometry()[0]).shape {
        Shape::Sphere { radius, .. } => assert_eq!(radius, 2.0),
        _ => panic!("expected sphere"),
    }
}

#[test]
fn test_redeclared_material_name_resolves_to_newest() {
    let text = "\
camera pinhole
end

material constant
    name M
    color 1 0 0
end

object sphere
    name First
    material M
end

material constant
    name M
    color 0 1 0
end

object sphere
    name Second
    material M
end
";
    let mut scene = Scene::new();
    scene.load_str(text).unwrap();

    let first = scene.object(scene.find_object("First").unwrap());
    let second = scene.object(scene.find_object("Second").unwrap());

    // Each reference bound to the newest M at its point in the file; the
    // earlier entity stayed alive for the object that captured it.
    assert_ne!(first.material, second.material);
    assert_eq!(second.material, scene.find_material("M"));
}

#[test]
fn test_variables_drive_keybindings() {
    let text = "\
camera pinhole
end
float exposure 1.0
int bounces 5
bool shadows off
";
    let mut scene = Scene::new();
    scene.load_str(text).unwrap();

    let mut keys = KeyBindings::new();
    keys.bind_float(scene.variables(), "exposure", 43, 0.25, 4.0);
    keys.bind_int(scene.variables(), "bounces", 45, -1, 0);
    keys.bind_int(scene.variables(), "shadows", 115, 0, 0);

    // Count bounces down past the limit.
    let mut seen = Vec::new();
    for _ in 0..6 {
        keys.apply(scene.variables_mut(), 45);
        let vars = scene.variables();
        seen.push(vars.int(vars.lookup_int("bounces").unwrap()));
    }
    assert_eq!(seen, vec![4, 3, 2, 1, 0, 0]);

    keys.apply(scene.variables_mut(), 43);
    keys.apply(scene.variables_mut(), 115);

    let vars = scene.variables();
    assert_eq!(vars.float(vars.lookup_float("exposure").unwrap()), 1.25);
    assert!(vars.bool(vars.lookup_bool("shadows").unwrap()));
}

#[test]
fn test_missing_scene_file_is_an_error() {
    let mut scene = Scene::new();
    let err = scene
        .load_file(std::path::Path::new("no/such/scene.txt"))
        .unwrap_err();
    assert!(format!("{:#}", err).contains("cannot open scene file"));
}
