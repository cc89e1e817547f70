//! Broad-phase collision scan
//!
//! Locates the body's cell and tests its edges, dispatching to the
//! narrow-phase resolvers where the edge classifications demand it. A
//! circle has to collide against implicit tile vertices as well as edges,
//! so on top of the own-cell and axis tests there is a diagonal case: it
//! uses the orthogonal neighbors' edge states to decide between a plain
//! corner-vertex push and one further resolver dispatch. That bounds the
//! recursion to exactly one extra level.

use glam::{IVec2, Vec2};
use log::debug;
use std::f32::consts::FRAC_1_SQRT_2;

use super::ball::Ball;
use super::edge::{Dir, EdgeState};
use super::grid::{CellIdx, TileGrid};
use super::resolve::{Resolution, Resolved, resolve_tile, vertex_contact};
use super::state::GameEvent;
use crate::tuning::Tuning;

/// Apply a resolution: impulse on the body, one hit of damage on the tile
fn respond(
    ball: &mut Ball,
    grid: &mut TileGrid,
    tuning: &Tuning,
    idx: CellIdx,
    res: Resolution,
) -> Resolved {
    if let Some(c) = res.contact() {
        ball.report_collision(c.push, c.normal, tuning);
        grid.damage(idx);
    }
    res.kind()
}

/// One full scan-and-resolve pass for the body against the grid.
///
/// Returns the lifecycle event when the body has left the playfield;
/// otherwise all effects are mutations of the body and grid state.
pub fn collide_ball_tilemap(
    ball: &mut Ball,
    grid: &mut TileGrid,
    tuning: &Tuning,
) -> Option<GameEvent> {
    if ball.pos.y > grid.fall_out_y() {
        debug!("ball left the playfield at y = {:.1}", ball.pos.y);
        return Some(GameEvent::BallLost);
    }

    let ci = grid.locate_clamped(ball.pos);

    // test against the body's own cell first
    let own = *grid.tile(ci);
    if !own.is_empty() {
        let d = ball.pos - own.center;
        let px = (own.half.x + ball.radius) - d.x.abs();
        let py = (own.half.y + ball.radius) - d.y.abs();
        let res = resolve_tile(px, py, IVec2::ZERO, ball, &own);
        respond(ball, grid, tuning, ci, res);
    }

    // deltas for the edge tests, sampled once: the own-cell resolution may
    // have moved the body (and cleared the tile, changing its edges)
    let center = own.center;
    let half = own.half;
    let d = ball.pos - center;

    // vertical edge
    let mut cross_v = false;
    let mut hit_v = Resolved::None;
    let mut o_v = 0i32;
    let py = (d.y.abs() + ball.radius) - half.y;
    if py > 0.0 {
        cross_v = true;
        let (vdir, ov) = if d.y < 0.0 { (Dir::Up, 1) } else { (Dir::Down, -1) };
        o_v = ov;
        let edge = grid.tile(ci).edges.get(vdir);
        if edge != EdgeState::Off {
            if let Some(ni) = grid.neighbor(ci, vdir) {
                if edge == EdgeState::Solid {
                    let push = Vec2::new(0.0, py * ov as f32);
                    ball.report_collision(push, Vec2::new(0.0, ov as f32), tuning);
                    grid.damage(ni);
                    hit_v = Resolved::Axis;
                } else {
                    let nt = *grid.tile(ni);
                    let res = resolve_tile(0.0, py, IVec2::new(0, ov), ball, &nt);
                    hit_v = respond(ball, grid, tuning, ni, res);
                }
            }
        }
    }

    // horizontal edge
    let mut cross_h = false;
    let mut hit_h = Resolved::None;
    let mut o_h = 0i32;
    let px = (d.x.abs() + ball.radius) - half.x;
    if px > 0.0 {
        cross_h = true;
        let (hdir, oh) = if d.x < 0.0 { (Dir::Left, 1) } else { (Dir::Right, -1) };
        o_h = oh;
        let edge = grid.tile(ci).edges.get(hdir);
        if edge != EdgeState::Off {
            if let Some(ni) = grid.neighbor(ci, hdir) {
                if edge == EdgeState::Solid {
                    let push = Vec2::new(px * oh as f32, 0.0);
                    ball.report_collision(push, Vec2::new(oh as f32, 0.0), tuning);
                    grid.damage(ni);
                    hit_h = Resolved::Axis;
                } else {
                    let nt = *grid.tile(ni);
                    let res = resolve_tile(px, 0.0, IVec2::new(oh, 0), ball, &nt);
                    hit_h = respond(ball, grid, tuning, ni, res);
                }
            }
        }
    }

    // The diagonal applies only when the body crossed both edges and
    // neither axis already resolved it. A body centered in its cell can
    // never reach this branch (it is smaller than a tile), so the strict
    // sign comparisons below cover every reachable case.
    if cross_h && hit_h != Resolved::Axis && cross_v && hit_v != Resolved::Axis {
        let quadrant = if d.x < 0.0 && d.y < 0.0 {
            Some((Dir::Up, Dir::Left))
        } else if d.x < 0.0 && d.y > 0.0 {
            Some((Dir::Down, Dir::Left))
        } else if d.x > 0.0 && d.y > 0.0 {
            Some((Dir::Down, Dir::Right))
        } else if d.x > 0.0 && d.y < 0.0 {
            Some((Dir::Up, Dir::Right))
        } else {
            None
        };

        if let Some((vdir, hdir)) = quadrant {
            if let (Some(vn), Some(hn)) = (grid.neighbor(ci, vdir), grid.neighbor(ci, hdir)) {
                // just as the axis tests pair this cell's edges with the
                // neighbors' states, the diagonal pairs the orthogonal
                // neighbors' edges with the diagonal tile's state
                let eh = grid.tile(vn).edges.get(hdir);
                let ev = grid.tile(hn).edges.get(vdir);
                if let Some(di) = grid.neighbor(vn, hdir) {
                    let off = IVec2::new(o_h, o_v);
                    if eh == EdgeState::Solid || ev == EdgeState::Solid {
                        // blocked corner: push out of the diagonal tile's
                        // vertex
                        let dt = *grid.tile(di);
                        let v = dt.center + off.as_vec2() * dt.half;
                        let fallback = off.as_vec2() * FRAC_1_SQRT_2;
                        if let Some(c) = vertex_contact(ball.pos - v, ball.radius, fallback) {
                            ball.report_collision(c.push, c.normal, tuning);
                            grid.damage(di);
                        }
                    } else if eh != EdgeState::Off || ev != EdgeState::Off {
                        // at least one interesting edge: dispatch to the
                        // diagonal tile with fresh penetrations (earlier
                        // pushes may have moved the body)
                        let dt = *grid.tile(di);
                        let dd = ball.pos - dt.center;
                        let px = (dd.x.abs() + ball.radius) - dt.half.x;
                        let py = (dd.y.abs() + ball.radius) - dt.half.y;
                        let res = resolve_tile(px, py, off, ball, &dt);
                        respond(ball, grid, tuning, di, res);
                    }
                }
            }
        }
    }

    None
}
