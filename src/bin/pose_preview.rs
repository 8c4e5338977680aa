//! Headless playback preview
//!
//! Loads a scene description JSON, records a small demonstration motion
//! on the first child node, plays it back with a fixed timestep while
//! printing sampled world positions, and writes the animation export
//! next to the input file.

use glam::{Mat4, Vec3};

use rigkit::core::logging;
use rigkit::editor::Session;

fn main() -> rigkit::core::Result<()> {
    logging::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "scene.json".to_string());

    let mut session = Session::new();
    session.load_scene_file(&path)?;

    for (node, world) in session.world_transforms() {
        let pos = world.w_axis.truncate();
        log::info!("{:?} {} at {:?}", node.id, node.name, pos);
    }

    // Pick the first non-root node if there is one, else the first root
    let target = session
        .graph()
        .nodes()
        .find(|n| n.parent.is_some())
        .or_else(|| session.graph().nodes().next())
        .map(|n| n.id);

    let Some(target) = target else {
        log::warn!("scene has no nodes, nothing to preview");
        return Ok(());
    };

    session.select_node(Some(target));

    // Record a two-key swing: rest pose at t=0, nudged pose at t=2
    session.record_keyframe(target, 0.0)?;
    let base = session.world_transform(target).unwrap_or(Mat4::IDENTITY);
    let nudged = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2)
        * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
        * base;
    session.apply_widget_edit(target, nudged)?;
    session.record_keyframe(target, 2.0)?;

    session.set_playing(true);
    let dt = 0.25;
    for frame in 0..12 {
        session.tick(dt);
        let world = session.world_transform(target).unwrap_or(Mat4::IDENTITY);
        let (_, rotation, translation) = world.to_scale_rotation_translation();
        log::info!(
            "frame {frame:2} t={:.2} pos={:?} rot={:?}",
            session.time(),
            translation,
            rotation
        );
    }
    session.set_playing(false);

    let out = format!("{path}.anim");
    session.save_animation(&out)?;
    Ok(())
}
