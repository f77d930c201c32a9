//! Camera parameters for rendering a probe capture.

use glam::{Mat4, Vec3};
use specula_core::Pose;

use crate::settings::CaptureSettings;

/// Everything the renderer needs to draw a capture from a solved pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureCamera {
    pub pose: Pose,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub aspect_ratio: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl CaptureCamera {
    pub fn new(pose: Pose, settings: &CaptureSettings, aspect_ratio: f32) -> Self {
        Self {
            pose,
            field_of_view: settings.field_of_view(),
            aspect_ratio,
            near_plane: settings.near_plane,
            far_plane: settings.far_plane,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.pose.to_matrix().inverse()
    }

    /// Left-handed perspective projection looking down +Z.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(
            self.field_of_view.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn to_uniform(&self) -> CaptureCameraUniform {
        CaptureCameraUniform {
            view_proj: self.view_projection_matrix(),
            position: self.pose.position,
            near_plane: self.near_plane,
            forward: self.pose.forward(),
            far_plane: self.far_plane,
        }
    }
}

/// GPU layout of a capture camera.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CaptureCameraUniform {
    pub view_proj: Mat4,
    pub position: Vec3,
    pub near_plane: f32,
    pub forward: Vec3,
    pub far_plane: f32,
}
