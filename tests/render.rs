use cairo::{Context, ImageSurface};
use serde_json::json;
use wayhud::draw::CairoSurface;
use wayhud::hud::Hud;
use wayhud::hud_args;

fn surface_with_context(width: i32, height: i32) -> (ImageSurface, Context) {
    let surface = ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    (surface, ctx)
}

fn paint(hud: &mut Hud, width: i32, height: i32) -> ImageSurface {
    let (surface, ctx) = surface_with_context(width, height);
    {
        let mut target = CairoSurface::new(&ctx);
        hud.repaint(&mut target);
    }
    drop(ctx);
    surface.flush();
    surface
}

/// Alpha of the pixel at `(x, y)`; ARGB32 stores it in the high byte.
fn alpha_at(surface: &mut ImageSurface, x: usize, y: usize) -> u8 {
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    let pixel = u32::from_ne_bytes([
        data[y * stride + x * 4],
        data[y * stride + x * 4 + 1],
        data[y * stride + x * 4 + 2],
        data[y * stride + x * 4 + 3],
    ]);
    (pixel >> 24) as u8
}

fn surface_has_pixels(surface: &mut ImageSurface) -> bool {
    surface
        .data()
        .map(|data| data.iter().any(|byte| *byte != 0))
        .unwrap_or(false)
}

#[test]
fn empty_queue_paints_nothing() {
    let mut hud = Hud::new();
    let mut surface = paint(&mut hud, 64, 64);
    assert!(!surface_has_pixels(&mut surface));
}

#[test]
fn point_paints_a_dot_at_its_position() {
    let mut hud = Hud::new();
    hud.draw(hud_args![20, 30]);
    let mut surface = paint(&mut hud, 64, 64);
    assert!(alpha_at(&mut surface, 20, 30) > 0);
    assert_eq!(alpha_at(&mut surface, 50, 50), 0);
}

#[test]
fn rectangle_outline_is_opaque_and_fill_is_faint() {
    let mut hud = Hud::new();
    hud.draw(hud_args![10, 10, 40, 40]);
    let mut surface = paint(&mut hud, 64, 64);
    let edge = alpha_at(&mut surface, 30, 10);
    let inside = alpha_at(&mut surface, 30, 30);
    assert!(edge > 200, "edge alpha {edge}");
    assert!(inside > 0 && inside < 64, "fill alpha {inside}");
}

#[test]
fn labels_render_text_plates() {
    let mut hud = Hud::new();
    hud.draw(hud_args![json!({"x": 60, "y": 40}), json!({"x": 140, "y": 40}), json!({"x": 100, "y": 100})])
        .angles()
        .lengths();
    let mut surface = paint(&mut hud, 200, 150);
    assert!(surface_has_pixels(&mut surface));
    // the length label of the top edge sits on its midpoint
    assert!(alpha_at(&mut surface, 100, 40) > 0);
}

#[test]
fn clear_wipes_previous_frame() {
    let mut hud = Hud::new();
    let (mut surface, ctx) = surface_with_context(64, 64);
    {
        let mut target = CairoSurface::new(&ctx);
        hud.draw(hud_args![10, 10]);
        hud.repaint(&mut target);
        hud.clear();
        hud.draw(hud_args![50, 50]);
        hud.repaint(&mut target);
    }
    drop(ctx);
    surface.flush();
    assert_eq!(alpha_at(&mut surface, 10, 10), 0);
    assert!(alpha_at(&mut surface, 50, 50) > 0);
}

#[test]
fn zero_opacity_hides_outline_but_keeps_faint_fill() {
    let mut hud = Hud::new();
    hud.set_opacity(0.0);
    hud.draw(hud_args![10, 10, 40, 40]);
    let mut surface = paint(&mut hud, 64, 64);
    let edge = alpha_at(&mut surface, 30, 10);
    let inside = alpha_at(&mut surface, 30, 30);
    assert!(edge < 64, "edge alpha {edge}");
    assert!(inside > 0 && inside < 64, "fill alpha {inside}");
}

#[test]
fn zero_opacity_hides_dots() {
    let mut hud = Hud::new();
    hud.set_opacity(0.0);
    hud.draw(hud_args![32, 32]);
    let mut surface = paint(&mut hud, 64, 64);
    assert!(!surface_has_pixels(&mut surface));
}
