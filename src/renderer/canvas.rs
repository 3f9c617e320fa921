//! Canvas 2D presenter

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Presenter, Shape, TextAlign};
use crate::economy::Rgb;

/// Draws shapes onto an HTML canvas, scaled for the device pixel ratio
pub struct CanvasPresenter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasPresenter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
        })
    }

    /// Size the backing store for a layout in CSS pixels
    pub fn resize(&mut self, width: f32, height: f32, dpr: f64) {
        self.dpr = dpr.max(1.0);
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
        log::debug!("Canvas resized to {}x{} @{}x", width, height, self.dpr);
    }

    fn css(color: Rgb) -> String {
        color.to_css()
    }

    fn draw(&self, shape: &Shape) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.set_shadow_blur(0.0);

        match shape {
            Shape::Fill { color, alpha } => {
                ctx.set_global_alpha(*alpha as f64);
                ctx.set_fill_style_str(&Self::css(*color));
                ctx.fill_rect(
                    0.0,
                    0.0,
                    self.canvas.width() as f64 / self.dpr,
                    self.canvas.height() as f64 / self.dpr,
                );
            }
            Shape::Rect {
                min,
                size,
                fill,
                stroke,
                glow,
            } => {
                let (x, y, w, h) = (min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                if let Some(stroke) = stroke {
                    ctx.set_shadow_blur(*glow as f64);
                    ctx.set_shadow_color(&Self::css(*stroke));
                }
                ctx.set_fill_style_str(&Self::css(*fill));
                ctx.fill_rect(x, y, w, h);
                if let Some(stroke) = stroke {
                    ctx.set_line_width(2.0);
                    ctx.set_stroke_style_str(&Self::css(*stroke));
                    ctx.stroke_rect(x, y, w, h);
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
                alpha,
            } => {
                ctx.set_global_alpha(*alpha as f64);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                if let Some(fill) = fill {
                    ctx.set_fill_style_str(&Self::css(*fill));
                    ctx.fill();
                }
                if let Some(stroke) = stroke {
                    ctx.set_line_width(3.0);
                    ctx.set_stroke_style_str(&Self::css(*stroke));
                    ctx.stroke();
                }
            }
            Shape::Line {
                from,
                to,
                color,
                width,
            } => {
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&Self::css(*color));
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
                glow,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                ctx.set_shadow_blur(*glow as f64);
                ctx.set_shadow_color(&Self::css(*stroke));
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.set_fill_style_str(&Self::css(*fill));
                ctx.fill();
                ctx.set_line_width(3.0);
                ctx.set_stroke_style_str(&Self::css(*stroke));
                ctx.stroke();
            }
            Shape::Text {
                pos,
                text,
                size,
                bold,
                color,
                align,
            } => {
                let weight = if *bold { "bold " } else { "" };
                ctx.set_font(&format!("{}{}px Arial", weight, size));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                ctx.set_fill_style_str(&Self::css(*color));
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }
}

impl Presenter for CanvasPresenter {
    type Error = JsValue;

    fn present(&mut self, shapes: &[Shape]) -> Result<(), JsValue> {
        self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        for shape in shapes {
            self.draw(shape)?;
        }
        Ok(())
    }
}
