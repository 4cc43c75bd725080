use approx::assert_abs_diff_eq;
use cgmath::{InnerSpace, Matrix4, Vector3};
use room_ngin::{
    data_structures::{
        block::unit_box,
        capture::{CapturedStructure, SurfaceKind},
        instance::Instance,
        model::MaterialUniform,
        scene_graph::{RoomScene, SurfaceNode},
        style::{DOOR_TEXTURE, Diffuse, FLOOR_TEXTURE, SurfaceStyle, WINDOW_TEXTURE},
    },
    merge::StructureBuilder,
    render::Pass,
};

use crate::common::test_utils::{
    BUNDLED_SURFACES, adjacent_room, bundled_room, room, translation, wall,
};

mod common;

fn bundled_scene() -> (CapturedStructure, RoomScene) {
    let structure = StructureBuilder::new().merge(&[bundled_room()]).unwrap();
    let scene = RoomScene::from_structure(structure.clone());
    (structure, scene)
}

#[test]
fn should_build_one_node_per_surface() {
    let (structure, scene) = bundled_scene();

    assert_eq!(scene.len(), BUNDLED_SURFACES);
    for kind in SurfaceKind::ALL {
        assert_eq!(
            scene.nodes(kind).count(),
            structure.surfaces(kind).len(),
            "{kind}"
        );
    }
}

#[test]
fn should_emit_nodes_grouped_by_category_in_fixed_order() {
    let (_, scene) = bundled_scene();
    let kinds: Vec<SurfaceKind> = scene.children.iter().map(|node| node.kind).collect();

    assert_eq!(
        kinds,
        vec![
            SurfaceKind::Floor,
            SurfaceKind::Wall,
            SurfaceKind::Wall,
            SurfaceKind::Wall,
            SurfaceKind::Wall,
            SurfaceKind::Door,
            SurfaceKind::Opening,
            SurfaceKind::Window,
        ]
    );
}

#[test]
fn should_copy_transform_bit_for_bit() {
    let (structure, scene) = bundled_scene();

    for kind in SurfaceKind::ALL {
        for surface in structure.surfaces(kind) {
            let node = scene.find(&surface.identifier_string()).unwrap();
            let expected = surface.transform.map(f32::to_bits);
            let actual = node.transform_columns().map(f32::to_bits);
            assert_eq!(actual, expected, "{}", node.name);
        }
    }
}

#[test]
fn should_name_nodes_by_identifier() {
    let (structure, scene) = bundled_scene();

    for (node, surface) in scene.children.iter().zip(
        SurfaceKind::ALL
            .iter()
            .flat_map(|kind| structure.surfaces(*kind)),
    ) {
        assert_eq!(node.name, surface.identifier_string());
        assert!(!node.name.starts_with("Space"));
        assert_eq!(node.label, format!("Space {}", node.kind));
    }
}

#[test]
fn should_size_boxes_from_dimensions_and_category_thickness() {
    let (structure, scene) = bundled_scene();
    let expected_thickness = |kind| match kind {
        SurfaceKind::Floor | SurfaceKind::Wall => 0.01,
        SurfaceKind::Door | SurfaceKind::Opening => 0.02,
        SurfaceKind::Window => 0.03,
    };

    for node in &scene.children {
        let surface = structure
            .surfaces(node.kind)
            .iter()
            .find(|s| s.identifier_string() == node.name)
            .unwrap();
        assert_eq!(node.geometry.width, surface.dimensions[0]);
        assert_eq!(node.geometry.height, surface.dimensions[1]);
        assert_eq!(node.geometry.length, expected_thickness(node.kind));
    }
}

#[test]
fn should_style_surfaces_per_category() {
    let floor = SurfaceKind::Floor.style();
    assert_eq!(floor.diffuse, Diffuse::Texture(FLOOR_TEXTURE));
    assert!(floor.tiled);
    assert!(!floor.transparent);

    let wall = SurfaceKind::Wall.style();
    assert_eq!(wall.diffuse, Diffuse::Color([0.5, 0.5, 0.5, 1.0]));
    assert!(!wall.transparent);

    let door = SurfaceKind::Door.style();
    assert_eq!(door.diffuse, Diffuse::Texture(DOOR_TEXTURE));
    assert!(door.tiled);

    let opening = SurfaceKind::Opening.style();
    assert_eq!(opening.diffuse, Diffuse::Color([0.0, 0.0, 0.0, 1.0]));

    let window = SurfaceKind::Window.style();
    assert_eq!(window.diffuse, Diffuse::Texture(WINDOW_TEXTURE));
    assert!(window.transparent);
    assert!(window.double_sided);
    assert!(!window.specular);
    assert!(window.ambient_occlusion);
}

#[test]
fn should_hand_material_switches_to_shader() {
    let window = MaterialUniform::from(&SurfaceKind::Window.style());
    assert_eq!(window.specular, 0.0);
    assert_eq!(window.occlusion, 1.0);
    // textured materials take their colour from the image
    assert_eq!(window.color, [1.0; 4]);

    let wall = MaterialUniform::from(&SurfaceKind::Wall.style());
    assert_eq!(wall.color, [0.5, 0.5, 0.5, 1.0]);
    assert_eq!(wall.specular, 0.5);
    assert_eq!(wall.occlusion, 0.0);

    let opening = MaterialUniform::from(&SurfaceKind::Opening.style());
    assert_eq!(opening.color, [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn should_draw_categories_with_their_pass() {
    for kind in [
        SurfaceKind::Floor,
        SurfaceKind::Wall,
        SurfaceKind::Door,
        SurfaceKind::Opening,
    ] {
        assert_eq!(kind.style().pass(), Pass::Opaque, "{kind}");
    }
    let window = SurfaceKind::Window.style().pass();
    assert_eq!(window, Pass::Transparent);
    assert_eq!(window.cull_mode(), None);
    assert!(!window.writes_depth());
}

#[test]
fn should_not_cull_double_sided_opaque_styles() {
    let style = SurfaceStyle {
        double_sided: true,
        ..SurfaceKind::Wall.style()
    };

    assert_eq!(style.pass(), Pass::DoubleSided);
    assert_eq!(style.pass().cull_mode(), None);
    assert!(style.pass().writes_depth());
    assert_eq!(SurfaceKind::Wall.style().pass().cull_mode(), Some(wgpu::Face::Back));
}

#[test]
fn should_keep_degenerate_surfaces() {
    let rooms = [room(
        Some(2),
        vec![
            wall(0.0, 2.0, translation(0.0, 1.0, 0.0)),
            wall(-1.0, -2.0, translation(3.0, 1.0, 0.0)),
            wall(1.0, 1.0, [0.0; 16]),
        ],
    )];
    let structure = StructureBuilder::new().merge(&rooms).unwrap();
    let scene = RoomScene::from_structure(structure);

    assert_eq!(scene.len(), 3);
    assert_eq!(scene.children[0].geometry.width, 0.0);
    assert_eq!(scene.children[1].geometry.width, -1.0);
    assert_eq!(scene.children[1].geometry.height, -2.0);
    assert_eq!(scene.children[2].transform, Matrix4::from([[0.0; 4]; 4]));
}

#[test]
fn should_build_empty_scene_from_empty_structure() {
    let scene = RoomScene::from_structure(CapturedStructure::default());
    assert!(scene.is_empty());
    assert!(scene.bounds().is_none());
}

#[test]
fn should_bound_the_bundled_room() {
    let (_, scene) = bundled_scene();
    let bounds = scene.bounds().unwrap();

    assert_abs_diff_eq!(bounds.min.x, -2.0, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.max.x, 2.0, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.min.y, 0.0, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.max.y, 2.5, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.min.z, -1.5, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.max.z, 1.5, epsilon = 0.02);
    assert_abs_diff_eq!(bounds.center().y, 1.25, epsilon = 0.02);
}

#[test]
fn should_grow_bounds_with_adjacent_room() {
    let structure = StructureBuilder::new()
        .merge(&[bundled_room(), adjacent_room()])
        .unwrap();
    let scene = RoomScene::from_structure(structure);
    let bounds = scene.bounds().unwrap();

    assert_abs_diff_eq!(bounds.max.x, 5.0, epsilon = 0.02);
}

#[test]
fn should_build_closed_unit_box() {
    let (vertices, indices) = unit_box();

    assert_eq!(vertices.len(), 24);
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|i| (*i as usize) < vertices.len()));
    for vertex in &vertices {
        assert!(vertex.position.iter().all(|c| c.abs() == 0.5));
    }
    // every triangle winds counter-clockwise seen from outside
    for triangle in indices.chunks(3) {
        let [a, b, c] = [0, 1, 2].map(|i| Vector3::from(vertices[triangle[i] as usize].position));
        let normal = Vector3::from(vertices[triangle[0] as usize].normal);
        let face = (b - a).cross(c - a).normalize();
        assert_abs_diff_eq!(face.dot(normal), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn should_stretch_instance_over_surface() {
    let (_, scene) = bundled_scene();
    let floor: &SurfaceNode = scene.nodes(SurfaceKind::Floor).next().unwrap();
    let instance = Instance::from(floor);

    assert_eq!(instance.transform, floor.transform);
    assert_eq!(instance.scale, Vector3::new(4.0, 3.0, 0.01));
    // tiled: the texture repeats once per metre
    assert_eq!(instance.uv_scale, cgmath::Vector2::new(4.0, 3.0));

    let raw = instance.to_raw();
    let expected: [[f32; 4]; 4] =
        (floor.transform * Matrix4::from_nonuniform_scale(4.0, 3.0, 0.01)).into();
    assert_eq!(raw.model(), expected);
    assert_eq!(raw.handedness(), 1.0);
}

#[test]
fn should_not_tile_untextured_surfaces() {
    let (_, scene) = bundled_scene();
    let wall = scene.nodes(SurfaceKind::Wall).next().unwrap();
    let instance = Instance::from(wall);

    assert_eq!(instance.uv_scale, cgmath::Vector2::new(1.0, 1.0));
    assert_eq!(instance.scale, Vector3::new(4.0, 2.5, 0.01));
}
