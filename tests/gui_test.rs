use portal_scene::{
    data_structures::texture::{SAMPLE_COUNT, pick_sample_count},
    pipelines::{
        basic::{PipelineOptions, RenderTarget},
        gui::{GuiVertex, ScreenGeometry, scissor_rect},
    },
};
use wgpu::TextureFormatFeatureFlags as Flags;

#[test]
fn should_scale_clip_rects_to_pixels() {
    let clip = egui::Rect::from_min_max(egui::pos2(10.0, 20.0), egui::pos2(110.0, 70.0));
    assert_eq!(scissor_rect(clip, 1.0, [800, 600]), Some([10, 20, 100, 50]));
    assert_eq!(scissor_rect(clip, 2.0, [800, 600]), Some([20, 40, 200, 100]));
}

#[test]
fn should_clamp_clip_rects_to_the_target() {
    assert_eq!(scissor_rect(egui::Rect::EVERYTHING, 1.5, [800, 600]), Some([0, 0, 800, 600]));

    let partly_outside = egui::Rect::from_min_max(egui::pos2(700.0, -10.0), egui::pos2(900.0, 30.0));
    assert_eq!(scissor_rect(partly_outside, 1.0, [800, 600]), Some([700, 0, 100, 30]));

    let outside = egui::Rect::from_min_max(egui::pos2(900.0, 0.0), egui::pos2(950.0, 30.0));
    assert_eq!(scissor_rect(outside, 1.0, [800, 600]), None);
    assert_eq!(scissor_rect(egui::Rect::NOTHING, 1.0, [800, 600]), None);
}

#[test]
fn should_derive_pixels_per_point_from_the_drawing_buffer() {
    let screen = ScreenGeometry {
        size_in_points: [1000.0, 600.0],
        size_in_pixels: [2000, 1200],
    };
    assert_eq!(screen.pixels_per_point(), 2.0);
}

#[test]
fn should_convert_egui_vertices() {
    let vertex = egui::epaint::Vertex {
        pos: egui::pos2(3.0, 4.0),
        uv: egui::pos2(0.25, 0.75),
        color: egui::Color32::from_rgba_premultiplied(10, 20, 30, 40),
    };
    let converted = GuiVertex::from(&vertex);
    assert_eq!(converted.position, [3.0, 4.0]);
    assert_eq!(converted.tex_coords, [0.25, 0.75]);
    assert_eq!(converted.color, [10, 20, 30, 40]);
    assert_eq!(std::mem::size_of::<GuiVertex>(), 20);
}

#[test]
fn should_multisample_when_both_formats_allow_it() {
    let x4 = Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE;
    assert_eq!(pick_sample_count(x4, Flags::MULTISAMPLE_X4), SAMPLE_COUNT);
    assert_eq!(SAMPLE_COUNT, 4);
    assert_eq!(pick_sample_count(Flags::empty(), Flags::MULTISAMPLE_X4), 1);
    assert_eq!(pick_sample_count(x4, Flags::empty()), 1);

    let target = RenderTarget {
        format: wgpu::TextureFormat::Bgra8UnormSrgb,
        sample_count: SAMPLE_COUNT,
    };
    assert_eq!(target.multisample().count, 4);
    assert_eq!(target.multisample().mask, !0);
}

#[test]
fn should_draw_the_overlay_over_everything() {
    let overlay = PipelineOptions::OVERLAY;
    assert_eq!(overlay.depth_compare, wgpu::CompareFunction::Always);
    assert!(!overlay.depth_write);
    assert_eq!(overlay.blend, Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING));
    assert_eq!(PipelineOptions::default(), PipelineOptions::OPAQUE);
}
