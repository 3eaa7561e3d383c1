use egui::Color32;

use crate::pins::PinSpace;

/// Settings fixed for the lifetime of an editing session.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct EditorConfig {
    pub pin_space: PinSpace,
    pub baud_rate: u32,
    pub canvas: CanvasConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pin_space: PinSpace::default(),
            baud_rate: 9600,
            canvas: CanvasConfig::default(),
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct CanvasConfig {
    pub resize_handle_size: f32,
    pub wire_thickness: f32,
    pub controller_color: Color32,
    pub led_off_color: Color32,
    pub led_on_color: Color32,
    pub button_color: Color32,
    pub button_pressed_color: Color32,
    pub wire_color: Color32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            resize_handle_size: 10.0,
            wire_thickness: 2.0,
            controller_color: Color32::from_rgb(0, 110, 120),
            led_off_color: Color32::from_rgb(90, 20, 20),
            led_on_color: Color32::from_rgb(255, 60, 60),
            button_color: Color32::from_rgb(70, 70, 80),
            button_pressed_color: Color32::from_rgb(40, 160, 90),
            wire_color: Color32::LIGHT_BLUE,
        }
    }
}
