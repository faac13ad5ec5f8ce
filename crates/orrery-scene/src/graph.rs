//! The live scene the renderer draws from.

use glam::{Quat, Vec3};
use orrery_sim::SimulationSnapshot;
use tracing::warn;

use crate::light::Light;
use crate::material::Color;
use crate::node::{NodeRole, SceneNode};
use crate::scene::{SceneDescription, SceneKind};
use crate::starfield::Star;

/// Scene nodes plus the lookup needed to write simulation state into them.
///
/// Positions here are display copies; the simulation owns the real ones.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    kind: SceneKind,
    nodes: Vec<SceneNode>,
    lights: Vec<Light>,
    clear_color: Color,
    stars: Vec<Star>,
    /// Node index for each orbiting body, in snapshot order once resolved.
    orbiting: Vec<(String, usize)>,
}

impl SceneGraph {
    pub fn new(description: &SceneDescription) -> Self {
        let orbiting = description
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.role == NodeRole::Orbiting)
            .map(|(index, node)| (node.name.clone(), index))
            .collect();
        Self {
            kind: description.kind,
            nodes: description.nodes.clone(),
            lights: description.lights.clone(),
            clear_color: description.clear_color,
            stars: description.stars.clone(),
            orbiting,
        }
    }

    /// Write positions and spins from the simulation into node transforms.
    ///
    /// Orbital-plane `(x, y)` maps to world `(x, 0, z)`. Bodies without a
    /// matching node are skipped with a warning.
    pub fn sync(&mut self, snapshot: &SimulationSnapshot<'_>) {
        let sun_rotation = Quat::from_rotation_y(snapshot.sun_spin_angle as f32);
        let glow_rotation = snapshot
            .glow_spin_angle
            .map(|angle| Quat::from_rotation_y(angle as f32));

        for node in &mut self.nodes {
            match node.role {
                NodeRole::CentralBody => node.transform.rotation = sun_rotation,
                NodeRole::Glow => {
                    if let Some(rotation) = glow_rotation {
                        node.transform.rotation = rotation;
                    }
                }
                NodeRole::Static | NodeRole::Orbiting => {}
            }
        }

        for body in &snapshot.bodies {
            let Some(index) = self.node_index(body.name) else {
                warn!(body = body.name, "No scene node for simulated body");
                continue;
            };
            let node = &mut self.nodes[index];
            node.transform.translation =
                Vec3::new(body.position.x as f32, 0.0, body.position.y as f32);
            node.transform.rotation = Quat::from_rotation_y(body.spin_angle as f32);
        }
    }

    fn node_index(&self, name: &str) -> Option<usize> {
        self.orbiting
            .iter()
            .find(|(node_name, _)| node_name == name)
            .map(|(_, index)| *index)
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Every distinct texture file the nodes' materials reference, in
    /// first-use order.
    pub fn texture_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for node in &self.nodes {
            for name in node.material.texture_names() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneSettings;
    use orrery_sim::{SimulationContext, SimulationParams};

    fn solar_graph() -> SceneGraph {
        let settings = SceneSettings {
            star_count: 10,
            ..SceneSettings::default()
        };
        SceneGraph::new(&SceneDescription::build(
            SceneKind::SolarSystem,
            &settings,
        ))
    }

    #[test]
    fn test_sync_places_planets_in_xz_plane() {
        let mut graph = solar_graph();
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(0.5);
        graph.sync(&ctx.snapshot());

        for body in ctx.bodies() {
            let node = graph.node(body.name()).unwrap();
            let t = node.transform.translation;
            assert_eq!(t.y, 0.0);
            assert!((t.x - body.position().x as f32).abs() < 1e-3);
            assert!((t.z - body.position().y as f32).abs() < 1e-3);
            let radius = Vec3::new(t.x, 0.0, t.z).length();
            assert!((radius - body.scaled_distance() as f32).abs() < 1e-2);
        }
    }

    #[test]
    fn test_sync_keeps_scale() {
        let mut graph = solar_graph();
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        ctx.advance(0.1);
        graph.sync(&ctx.snapshot());
        assert!((graph.node("Earth").unwrap().radius() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_glow_rotation_matches_sun() {
        let mut graph = solar_graph();
        let mut ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        for _ in 0..10 {
            ctx.advance(0.1);
            graph.sync(&ctx.snapshot());
            let sun = graph.node("Sun").unwrap().transform.rotation;
            let glow = graph.node("Glow").unwrap().transform.rotation;
            assert_eq!(sun, glow);
        }
        assert_ne!(
            graph.node("Sun").unwrap().transform.rotation,
            Quat::IDENTITY
        );
    }

    #[test]
    fn test_glowing_sun_scene_syncs_without_planets() {
        let mut graph = SceneGraph::new(&SceneDescription::build(
            SceneKind::GlowingSun,
            &SceneSettings::default(),
        ));
        let mut ctx =
            SimulationContext::standalone_sun(SimulationParams::default(), true).unwrap();
        ctx.advance(1.0);
        graph.sync(&ctx.snapshot());
        assert_eq!(
            graph.node("Sun").unwrap().transform.rotation,
            graph.node("Glow").unwrap().transform.rotation
        );
    }

    #[test]
    fn test_static_nodes_untouched() {
        let mut graph = SceneGraph::new(&SceneDescription::build(
            SceneKind::FlatSphere,
            &SceneSettings::default(),
        ));
        let before = graph.nodes()[0].transform;
        let mut ctx =
            SimulationContext::standalone_sun(SimulationParams::default(), false).unwrap();
        ctx.advance(1.0);
        graph.sync(&ctx.snapshot());
        assert_eq!(graph.nodes()[0].transform, before);
    }

    #[test]
    fn test_unknown_body_is_skipped() {
        let mut graph = SceneGraph::new(&SceneDescription::build(
            SceneKind::GlowingSun,
            &SceneSettings::default(),
        ));
        let ctx = SimulationContext::solar_system(SimulationParams::default()).unwrap();
        graph.sync(&ctx.snapshot());
        assert_eq!(graph.nodes().len(), 2);
    }

    #[test]
    fn test_texture_names_deduplicated() {
        let names = solar_graph().texture_names();
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], orrery_sim::SUN_TEXTURE);
        assert!(names.iter().any(|n| n == "neptune.jpg"));

        let glowing = SceneGraph::new(&SceneDescription::build(
            SceneKind::GlowingSun,
            &SceneSettings::default(),
        ));
        assert_eq!(glowing.texture_names(), [orrery_sim::SUN_TEXTURE.to_string()]);

        let flat = SceneGraph::new(&SceneDescription::build(
            SceneKind::FlatSphere,
            &SceneSettings::default(),
        ));
        assert!(flat.texture_names().is_empty());
    }
}
