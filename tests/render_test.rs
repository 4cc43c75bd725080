#[cfg(feature = "integration-tests")]
use room_ngin::{
    Assets, RoomScene, StructureBuilder, ViewerConfig, offscreen::Offscreen, render::Pass,
};

#[cfg(feature = "integration-tests")]
use crate::common::test_utils::{bundled_assets, bundled_room, fixture};

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
const SIZE: u32 = 256;

#[cfg(feature = "integration-tests")]
async fn offscreen(assets: Assets, clear_colour: wgpu::Color) -> Offscreen {
    let viewer = ViewerConfig {
        assets,
        clear_colour,
        ..ViewerConfig::default()
    };
    Offscreen::new(SIZE, SIZE, &viewer)
        .await
        .expect("headless rendering needs a graphics adapter")
}

#[cfg(feature = "integration-tests")]
fn bundled_scene() -> RoomScene {
    RoomScene::from_structure(StructureBuilder::new().merge(&[bundled_room()]).unwrap())
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_render_clear_colour_without_scene() {
    let mut offscreen = offscreen(bundled_assets(), wgpu::Color::WHITE).await;

    let frame = offscreen.render(None).await.unwrap();

    assert_eq!(frame.dimensions(), (SIZE, SIZE));
    let white = image::Rgba([255, 255, 255, 255]);
    for pixel in frame.pixels() {
        assert_eq!(*pixel, white);
    }
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_draw_bundled_room_over_clear_colour() {
    let mut offscreen = offscreen(bundled_assets(), wgpu::Color::BLACK).await;
    let scene = bundled_scene();
    let blocks = offscreen.upload(&scene);
    offscreen.frame(&scene);

    let frame = offscreen.render(Some(&blocks)).await.unwrap();

    let black = image::Rgba([0, 0, 0, 255]);
    let drawn = frame.pixels().filter(|pixel| **pixel != black).count();
    let total = (frame.width() * frame.height()) as usize;
    assert!(drawn > total / 20, "only {drawn} of {total} pixels were drawn");
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_batch_categories_by_pass() {
    let offscreen = offscreen(bundled_assets(), wgpu::Color::BLACK).await;
    let scene = bundled_scene();
    let blocks = offscreen.upload(&scene);

    // floor, wall, door and opening are opaque, the window is blended
    assert_eq!(blocks.children.len(), 5);
    let batches = blocks.get_render().batches();
    assert_eq!(batches.get(Pass::Opaque).len(), 4);
    assert_eq!(batches.get(Pass::DoubleSided).len(), 0);
    assert_eq!(batches.get(Pass::Transparent).len(), 1);
    let walls = batches
        .get(Pass::Opaque)
        .iter()
        .map(|instanced| instanced.amount)
        .max();
    assert_eq!(walls, Some(4));
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_upload_untextured_material_when_texture_is_missing() {
    // the fixture directory holds no images
    let assets = Assets::new(fixture(""));
    let mut offscreen = offscreen(assets, wgpu::Color::BLACK).await;
    let scene = bundled_scene();
    let blocks = offscreen.upload(&scene);
    offscreen.frame(&scene);

    assert_eq!(blocks.children.len(), 5);
    for block in &blocks.children {
        assert_eq!(block.obj_model.materials.len(), 1, "{}", block.kind);
    }

    let frame = offscreen.render(Some(&blocks)).await.unwrap();
    let black = image::Rgba([0, 0, 0, 255]);
    assert!(frame.pixels().any(|pixel| *pixel != black));
}
