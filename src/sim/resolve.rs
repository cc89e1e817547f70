//! Narrow-phase shape resolvers
//!
//! One resolver per collision shape class. Each takes the precomputed
//! axial penetrations `(px, py)`, the cell offset `off` of the body
//! relative to the tile (both components zero when the body is inside the
//! tile's own cell, e.g. `off = (1, 0)` when the body is in the cell to
//! the tile's right), the body, and the tile, and returns how the body
//! should be displaced.
//!
//! Shared conventions:
//! - penetration is (combined extents) minus (measured distance); a value
//!   <= 0 means no contact and the resolver reports [`Resolution::None`]
//! - a zero-length vertex-to-center vector falls back to a canonical 45°
//!   push direction instead of dividing by zero
//! - vertex-vs-face selection uses the sign of the perp-dot between the
//!   slope normal and the vertex-to-center vector (a Voronoi region test)
//! - when both a slope push and an axial push would separate the body,
//!   the shorter one wins (minimum translation)
//!
//! Resolvers are pure: they report the push and outward normal through a
//! [`Contact`] and never mutate the body or the grid themselves.

use glam::{IVec2, Vec2};
use std::f32::consts::FRAC_1_SQRT_2;

use super::ball::Ball;
use super::tile::{ShapeClass, Tile};

/// A resolved collision: displacement that removes the penetration, and
/// the outward unit surface normal at the contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub push: Vec2,
    pub normal: Vec2,
}

/// Resolver outcome. `Axis` means the body was displaced along a grid
/// axis and no longer crosses the cell edge it was tested against;
/// `Other` means it was displaced along a shape-specific direction and
/// may still cross cell edges. The distinction only feeds the diagonal
/// dispatch decision in the broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    None,
    Axis(Contact),
    Other(Contact),
}

/// `Resolution` stripped of its contact payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    None,
    Axis,
    Other,
}

impl Resolution {
    #[inline]
    pub fn kind(&self) -> Resolved {
        match self {
            Resolution::None => Resolved::None,
            Resolution::Axis(_) => Resolved::Axis,
            Resolution::Other(_) => Resolved::Other,
        }
    }

    #[inline]
    pub fn contact(&self) -> Option<Contact> {
        match self {
            Resolution::None => None,
            Resolution::Axis(c) | Resolution::Other(c) => Some(*c),
        }
    }
}

/// Dispatch to the resolver for the tile's cached shape class. Empty (or
/// defensively dispatched unknown) tiles are a valid no-op.
pub fn resolve_tile(px: f32, py: f32, off: IVec2, ball: &Ball, tile: &Tile) -> Resolution {
    match tile.shape {
        ShapeClass::Empty => Resolution::None,
        ShapeClass::Full => project_full(px, py, off, ball, tile),
        ShapeClass::Slope45 => project_slope45(px, py, off, ball, tile),
        ShapeClass::Concave => project_concave(px, py, off, ball, tile),
        ShapeClass::Convex => project_convex(px, py, off, ball, tile),
        ShapeClass::Slope22Small => project_slope22_small(px, py, off, ball, tile),
        ShapeClass::Slope22Big => project_slope22_big(px, py, off, ball, tile),
        ShapeClass::Slope67Small => project_slope67_small(px, py, off, ball, tile),
        ShapeClass::Slope67Big => project_slope67_big(px, py, off, ball, tile),
        ShapeClass::Half => project_half(px, py, off, ball, tile),
    }
}

// ---------------------------------------------------------------- helpers

/// Canonical 45° fallback direction for a diagonal cell offset
#[inline]
fn diag_fallback(off: IVec2) -> Vec2 {
    off.as_vec2() * FRAC_1_SQRT_2
}

/// Push the body out of a point vertex. `fallback` is the unit direction
/// used when the body center sits exactly on the vertex.
pub(crate) fn vertex_contact(delta: Vec2, radius: f32, fallback: Vec2) -> Option<Contact> {
    let len = delta.length();
    let pen = radius - len;
    if pen <= 0.0 {
        return None;
    }
    let dir = if len == 0.0 { fallback } else { delta / len };
    Some(Contact {
        push: dir * pen,
        normal: dir,
    })
}

fn vertex_resolution(delta: Vec2, radius: f32, fallback: Vec2) -> Resolution {
    match vertex_contact(delta, radius, fallback) {
        Some(c) => Resolution::Other(c),
        None => Resolution::None,
    }
}

/// Smaller of the two axial penetrations, signed away from the tile
/// center. Returns the push vector and its magnitude.
fn axial_candidate(px: f32, py: f32, ball: &Ball, tile: &Tile) -> (Vec2, f32) {
    if px < py {
        let sx = if ball.pos.x - tile.center.x < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(px * sx, 0.0), px)
    } else {
        let sy = if ball.pos.y - tile.center.y < 0.0 { -1.0 } else { 1.0 };
        (Vec2::new(0.0, py * sy), py)
    }
}

/// Minimum-translation choice between the slope push `normal * pen_n` and
/// the smaller axial push
fn slope_or_axis(px: f32, py: f32, pen_n: f32, normal: Vec2, ball: &Ball, tile: &Tile) -> Resolution {
    let (axial, len_p) = axial_candidate(px, py, ball, tile);
    if len_p < pen_n && len_p > 0.0 {
        Resolution::Axis(Contact {
            push: axial,
            normal: axial / len_p,
        })
    } else {
        Resolution::Other(Contact {
            push: normal * pen_n,
            normal,
        })
    }
}

/// Voronoi-region split for a body in a neighboring cell: project out of
/// the vertex at the origin of `o`, or along the slope normal `s`.
/// `vertex_when_positive` selects which sign of `perp * slope_slope`
/// means the vertex region (the sense flips between the vertical and
/// horizontal neighbor cases).
fn vertex_or_slope(o: Vec2, s: Vec2, slope_sign: i32, vertex_when_positive: bool, radius: f32) -> Resolution {
    let perp = s.perp_dot(o) * slope_sign as f32;
    let vertex_side = if vertex_when_positive { perp > 0.0 } else { perp < 0.0 };
    if vertex_side {
        // perp != 0 here, so o has nonzero length
        let len = o.length();
        let pen = radius - len;
        if pen > 0.0 {
            let n = o / len;
            return Resolution::Other(Contact { push: n * pen, normal: n });
        }
    } else {
        // the body is in a neighboring cell, so the plain normal
        // projection is a valid penetration measure
        let dp = o.dot(s);
        let pen = radius - dp.abs();
        if pen > 0.0 {
            return Resolution::Other(Contact { push: s * pen, normal: s });
        }
    }
    Resolution::None
}

/// Direct push across a vertical cell edge
#[inline]
fn axis_contact_v(py: f32, ov: i32) -> Resolution {
    let ovf = ov as f32;
    Resolution::Axis(Contact {
        push: Vec2::new(0.0, py * ovf),
        normal: Vec2::new(0.0, ovf),
    })
}

/// Direct push across a horizontal cell edge
#[inline]
fn axis_contact_h(px: f32, oh: i32) -> Resolution {
    let ohf = oh as f32;
    Resolution::Axis(Contact {
        push: Vec2::new(px * ohf, 0.0),
        normal: Vec2::new(ohf, 0.0),
    })
}

// -------------------------------------------------------------- resolvers

/// Full block: minimum axial push from inside, plain axial push from an
/// edge neighbor, corner-vertex push from a diagonal neighbor.
fn project_full(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    if off.x == 0 {
        if off.y == 0 {
            let (axial, len_p) = axial_candidate(px, py, ball, t);
            if len_p <= 0.0 {
                return Resolution::None;
            }
            Resolution::Axis(Contact {
                push: axial,
                normal: axial / len_p,
            })
        } else {
            axis_contact_v(py, off.y)
        }
    } else if off.y == 0 {
        axis_contact_h(px, off.x)
    } else {
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// 45° slope
fn project_slope45(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let s = t.normal;
    let ss = sign.x * sign.y;

    if off.x == 0 {
        if off.y == 0 {
            // innermost point of the body along the slope normal, relative
            // to the tile center; negative projection means it crossed the
            // slope's half-plane
            let o = ball.pos - s * ball.radius - t.center;
            let dp = o.dot(s);
            if dp < 0.0 {
                return slope_or_axis(px, py, -dp, s, ball, t);
            }
            Resolution::None
        } else if sign.y * off.y < 0 {
            // square face above/below the slope
            axis_contact_v(py, off.y)
        } else {
            // slope or its end vertex, split by the closest vertex
            let v = Vec2::new(
                t.center.x - sign.x as f32 * t.half.x,
                t.center.y + off.y as f32 * t.half.y,
            );
            vertex_or_slope(ball.pos - v, s, ss, true, ball.radius)
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            axis_contact_h(px, off.x)
        } else {
            let v = Vec2::new(
                t.center.x + off.x as f32 * t.half.x,
                t.center.y - sign.y as f32 * t.half.y,
            );
            // the perp-dot sense flips between the vertical and horizontal
            // neighbor cases
            vertex_or_slope(ball.pos - v, s, ss, false, ball.radius)
        }
    } else {
        if sign.x * off.x + sign.y * off.y > 0 {
            // diagonal neighbor on the open side of the slope: out of reach
            return Resolution::None;
        }
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// Concave quarter-circle cutout: the boundary is an arc of radius
/// 2*half-width centered on the tile corner at `sign * half`
fn project_concave(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let signv = sign.as_vec2();
    let arc_r = t.half.x * 2.0;

    if off.x == 0 {
        if off.y == 0 {
            // vector from the body to the arc center
            let o = (t.center + signv * t.half) - ball.pos;
            let len = o.length();
            let pen = (len + ball.radius) - arc_r;
            if pen <= 0.0 {
                return Resolution::None;
            }
            let (axial, len_p) = axial_candidate(px, py, ball, t);
            if len_p < pen && len_p > 0.0 {
                Resolution::Axis(Contact {
                    push: axial,
                    normal: axial / len_p,
                })
            } else {
                // len > 0: the body is smaller than the arc, so it cannot
                // reach the arc center while penetrating the rim
                let n = o / len;
                Resolution::Other(Contact { push: n * pen, normal: n })
            }
        } else if sign.y * off.y < 0 {
            axis_contact_v(py, off.y)
        } else {
            // only the vertical rim tip is reachable from here
            let v = Vec2::new(
                t.center.x - signv.x * t.half.x,
                t.center.y + off.y as f32 * t.half.y,
            );
            vertex_resolution(ball.pos - v, ball.radius, Vec2::new(0.0, off.y as f32))
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            axis_contact_h(px, off.x)
        } else {
            let v = Vec2::new(
                t.center.x + off.x as f32 * t.half.x,
                t.center.y - signv.y * t.half.y,
            );
            vertex_resolution(ball.pos - v, ball.radius, Vec2::new(off.x as f32, 0.0))
        }
    } else {
        if sign.x * off.x + sign.y * off.y > 0 {
            return Resolution::None;
        }
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// Convex quarter-circle: the boundary is an arc of radius 2*half-width
/// centered on the corner opposite the bulge
fn project_convex(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let signv = sign.as_vec2();
    let arc_r = t.half.x * 2.0;

    // vector from the arc center to the body
    let o = ball.pos - (t.center - signv * t.half);
    let len = o.length();
    let pen = (arc_r + ball.radius) - len;

    if off.x == 0 {
        if off.y == 0 {
            if pen <= 0.0 {
                return Resolution::None;
            }
            let (axial, len_p) = axial_candidate(px, py, ball, t);
            if len_p < pen && len_p > 0.0 {
                Resolution::Axis(Contact {
                    push: axial,
                    normal: axial / len_p,
                })
            } else if len > 0.0 {
                let n = o / len;
                Resolution::Other(Contact { push: n * pen, normal: n })
            } else {
                Resolution::None
            }
        } else if sign.y * off.y < 0 {
            axis_contact_v(py, off.y)
        } else {
            convex_surface(o, len, pen)
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            axis_contact_h(px, off.x)
        } else {
            convex_surface(o, len, pen)
        }
    } else if sign.x * off.x + sign.y * off.y > 0 {
        // diagonal neighbor the bulge points into: arc surface only
        convex_surface(o, len, pen)
    } else {
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// Arc-surface push for a body in a neighboring cell (`len` cannot be
/// zero there)
fn convex_surface(o: Vec2, len: f32, pen: f32) -> Resolution {
    if pen > 0.0 && len > 0.0 {
        let n = o / len;
        Resolution::Other(Contact { push: n * pen, normal: n })
    } else {
        Resolution::None
    }
}

/// 22.5° slope, small variant: the wedge fills less than half the cell
/// height, so the cell its normal's vertical sense points at can never be
/// reached
fn project_slope22_small(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let s = t.normal;
    let ss = sign.x * sign.y;

    if sign.y * off.y > 0 {
        return Resolution::None;
    }
    if off.x == 0 {
        if off.y == 0 {
            // apex of the wedge sits at the middle of the cell's slope-side
            // edge
            let apex = Vec2::new(t.center.x - sign.x as f32 * t.half.x, t.center.y);
            let o = ball.pos - apex;
            let perp = s.perp_dot(o) * ss as f32;
            if perp > 0.0 {
                // vertex region (perp != 0, so o is nonzero)
                let len = o.length();
                let pen = ball.radius - len;
                if pen > 0.0 {
                    let n = o / len;
                    return Resolution::Other(Contact { push: n * pen, normal: n });
                }
                Resolution::None
            } else {
                let oi = o - s * ball.radius;
                let dp = oi.dot(s);
                if dp < 0.0 {
                    return slope_or_axis(px, py, -dp, s, ball, t);
                }
                Resolution::None
            }
        } else {
            // vertical offset opposes the normal here (the aligned case
            // returned above): plain face
            axis_contact_v(py, off.y)
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            // face side; the apex vertex overhangs the face near the middle
            let apex = Vec2::new(t.center.x - sign.x as f32 * t.half.x, t.center.y);
            let delta = ball.pos - apex;
            if delta.y * (sign.y as f32) < 0.0 {
                axis_contact_h(px, off.x)
            } else {
                let fallback = Vec2::new(off.x as f32, sign.y as f32) * FRAC_1_SQRT_2;
                vertex_resolution(delta, ball.radius, fallback)
            }
        } else {
            let v = Vec2::new(
                t.center.x + off.x as f32 * t.half.x,
                t.center.y - sign.y as f32 * t.half.y,
            );
            vertex_or_slope(ball.pos - v, s, ss, false, ball.radius)
        }
    } else {
        // diagonal on the closed vertical side: corner vertex only
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// 22.5° slope, big variant: the slope face extends into the horizontally
/// adjacent cell
fn project_slope22_big(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let s = t.normal;
    let ss = sign.x * sign.y;
    // where the slope face meets the cell boundary
    let base = Vec2::new(
        t.center.x - sign.x as f32 * t.half.x,
        t.center.y + sign.y as f32 * t.half.y,
    );

    if off.x == 0 {
        if off.y == 0 {
            let o = ball.pos - s * ball.radius - base;
            let dp = o.dot(s);
            if dp < 0.0 {
                return slope_or_axis(px, py, -dp, s, ball, t);
            }
            Resolution::None
        } else if sign.y * off.y < 0 {
            axis_contact_v(py, off.y)
        } else {
            vertex_or_slope(ball.pos - base, s, ss, true, ball.radius)
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            axis_contact_h(px, off.x)
        } else {
            // edge, slope, or vertex, depending on height
            let o = ball.pos - Vec2::new(t.center.x + sign.x as f32 * t.half.x, t.center.y);
            if o.y * (sign.y as f32) < 0.0 {
                // the square half-face above/below the slope's high end
                axis_contact_h(px, off.x)
            } else {
                vertex_or_slope(o, s, ss, false, ball.radius)
            }
        }
    } else if sign.x * off.x + sign.y * off.y > 0 {
        // the slope face reaches into the diagonal cell its normal points at
        let o = ball.pos - s * ball.radius - base;
        let dp = o.dot(s);
        if dp < 0.0 {
            return Resolution::Other(Contact {
                push: s * -dp,
                normal: s,
            });
        }
        Resolution::None
    } else {
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// 67.5° slope, small variant: mirror of the small 22.5° wedge, steep
/// instead of shallow; the cell its normal's horizontal sense points at
/// is unreachable
fn project_slope67_small(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let s = t.normal;
    let ss = sign.x * sign.y;

    if sign.x * off.x > 0 {
        return Resolution::None;
    }
    if off.x == 0 {
        if off.y == 0 {
            // apex at the middle of the cell's top/bottom edge
            let apex = Vec2::new(t.center.x, t.center.y - sign.y as f32 * t.half.y);
            let o = ball.pos - apex;
            let perp = s.perp_dot(o) * ss as f32;
            if perp < 0.0 {
                let len = o.length();
                let pen = ball.radius - len;
                if pen > 0.0 {
                    let n = o / len;
                    return Resolution::Other(Contact { push: n * pen, normal: n });
                }
                Resolution::None
            } else {
                let oi = o - s * ball.radius;
                let dp = oi.dot(s);
                if dp < 0.0 {
                    return slope_or_axis(px, py, -dp, s, ball, t);
                }
                Resolution::None
            }
        } else if sign.y * off.y < 0 {
            // against the slope vertically: face, or the apex vertex that
            // overhangs it
            let apex = Vec2::new(t.center.x, t.center.y - sign.y as f32 * t.half.y);
            let delta = ball.pos - apex;
            if delta.x * (sign.x as f32) < 0.0 {
                axis_contact_v(py, off.y)
            } else {
                let fallback = Vec2::new(sign.x as f32, off.y as f32) * FRAC_1_SQRT_2;
                vertex_resolution(delta, ball.radius, fallback)
            }
        } else {
            let v = Vec2::new(
                t.center.x - sign.x as f32 * t.half.x,
                t.center.y + off.y as f32 * t.half.y,
            );
            vertex_or_slope(ball.pos - v, s, ss, true, ball.radius)
        }
    } else if off.y == 0 {
        // a horizontal neighbor is necessarily on the face side (the
        // aligned side returned above)
        axis_contact_h(px, off.x)
    } else {
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// 67.5° slope, big variant: the slope face extends into the vertically
/// adjacent cell
fn project_slope67_big(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    let s = t.normal;
    let ss = sign.x * sign.y;
    let base = Vec2::new(
        t.center.x + sign.x as f32 * t.half.x,
        t.center.y - sign.y as f32 * t.half.y,
    );

    if off.x == 0 {
        if off.y == 0 {
            let o = ball.pos - s * ball.radius - base;
            let dp = o.dot(s);
            if dp < 0.0 {
                return slope_or_axis(px, py, -dp, s, ball, t);
            }
            Resolution::None
        } else if sign.y * off.y < 0 {
            axis_contact_v(py, off.y)
        } else {
            // edge, slope, or vertex
            let o = ball.pos - Vec2::new(t.center.x, t.center.y + sign.y as f32 * t.half.y);
            if o.x * (sign.x as f32) < 0.0 {
                axis_contact_v(py, off.y)
            } else {
                vertex_or_slope(o, s, ss, true, ball.radius)
            }
        }
    } else if off.y == 0 {
        if sign.x * off.x < 0 {
            axis_contact_h(px, off.x)
        } else {
            vertex_or_slope(ball.pos - base, s, ss, false, ball.radius)
        }
    } else if sign.x * off.x + sign.y * off.y > 0 {
        let o = ball.pos - s * ball.radius - base;
        let dp = o.dot(s);
        if dp < 0.0 {
            return Resolution::Other(Contact {
                push: s * -dp,
                normal: s,
            });
        }
        Resolution::None
    } else {
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}

/// Half tile: an axis-aligned half box. Unreachable from the cell its
/// normal points at; from perpendicular neighbors the body can hit either
/// the half-edge side or its exposed vertex.
fn project_half(px: f32, py: f32, off: IVec2, ball: &Ball, t: &Tile) -> Resolution {
    let sign = t.sign;
    // alignment of the cell offset with the half-edge normal
    let celldp = off.x * sign.x + off.y * sign.y;
    if celldp > 0 {
        return Resolution::None;
    }

    if off.x == 0 {
        if off.y == 0 {
            // inside the cell: treat the half edge as an axis-aligned slope
            let s = sign.as_vec2();
            let o = ball.pos - s * ball.radius - t.center;
            let dp = o.dot(s);
            if dp < 0.0 {
                return slope_or_axis(px, py, -dp, s, ball, t);
            }
            Resolution::None
        } else if celldp == 0 {
            // perpendicular neighbor: half-edge side or its vertex
            let dx = ball.pos.x - t.center.x;
            if dx * (sign.x as f32) < 0.0 {
                axis_contact_v(py, off.y)
            } else {
                let dy = ball.pos.y - (t.center.y + off.y as f32 * t.half.y);
                let fallback = Vec2::new(sign.x as f32, off.y as f32) * FRAC_1_SQRT_2;
                vertex_resolution(Vec2::new(dx, dy), ball.radius, fallback)
            }
        } else {
            // opposite the normal: the full cell edge blocks
            axis_contact_v(py, off.y)
        }
    } else if off.y == 0 {
        if celldp == 0 {
            let dy = ball.pos.y - t.center.y;
            if dy * (sign.y as f32) < 0.0 {
                axis_contact_h(px, off.x)
            } else {
                let dx = ball.pos.x - (t.center.x + off.x as f32 * t.half.x);
                let fallback = Vec2::new(off.x as f32, sign.y as f32) * FRAC_1_SQRT_2;
                vertex_resolution(Vec2::new(dx, dy), ball.radius, fallback)
            }
        } else {
            axis_contact_h(px, off.x)
        }
    } else {
        // diagonal on the non-normal side: cell corner only
        let v = t.center + off.as_vec2() * t.half;
        vertex_resolution(ball.pos - v, ball.radius, diag_fallback(off))
    }
}
