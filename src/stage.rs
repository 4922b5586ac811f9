//! DOM presentation layer
//!
//! Maps entity ids to pooled DOM elements: create on first sight, restyle
//! every frame, drop when the entity disappears. Entities carry no rendering
//! handles; this module is the only place that touches the game-area DOM.
//! Any failure here is logged and ignored - it can never touch the sim.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::sim::{ExplosionKind, GameEvent, GameState};

/// Screen shake duration after a blast
const SHAKE_MS: f32 = 250.0;

/// The game-area DOM stage
pub struct Stage {
    document: Document,
    root: HtmlElement,
    ship: HtmlElement,
    boss: Option<HtmlElement>,
    /// Entity id -> pooled element, one map per entity class
    chickens: HashMap<u32, HtmlElement>,
    bullets: HashMap<u32, HtmlElement>,
    power_ups: HashMap<u32, HtmlElement>,
    explosions: HashMap<u32, HtmlElement>,
    shake_left_ms: f32,
}

impl Stage {
    /// Attach to the element with the given id. Returns None (logged) when
    /// the document or root is missing - the game runs headless then.
    pub fn attach(root_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let root: HtmlElement = document.get_element_by_id(root_id)?.dyn_into().ok()?;

        let ship = make_element(&document, "spaceship")?;
        let _ = root.append_child(&ship);

        Some(Self {
            document,
            root,
            ship,
            boss: None,
            chickens: HashMap::new(),
            bullets: HashMap::new(),
            power_ups: HashMap::new(),
            explosions: HashMap::new(),
            shake_left_ms: 0.0,
        })
    }

    /// React to this tick's events (screen shake only; audio is elsewhere)
    pub fn react(&mut self, events: &[GameEvent], screen_shake: bool) {
        if screen_shake && events.iter().any(|e| matches!(e, GameEvent::Explosion)) {
            self.shake_left_ms = SHAKE_MS;
        }
    }

    /// Restyle the whole stage from the current state. Called once per frame
    /// after the tick.
    pub fn sync(&mut self, state: &GameState, dt_ms: f32) {
        place(&self.ship, state.ship.rect.pos.x, state.ship.rect.pos.y);
        size(&self.ship, state.ship.rect.size.x, state.ship.rect.size.y);

        self.sync_boss(state);
        sync_pool(
            &self.document,
            &self.root,
            &mut self.chickens,
            "chicken",
            state.chickens.iter().map(|c| {
                (c.id, c.rect, if c.dive.is_some() { " diving" } else { "" })
            }),
        );
        sync_pool(
            &self.document,
            &self.root,
            &mut self.bullets,
            "bullet",
            state.bullets.iter().map(|b| {
                (b.id, b.rect, if b.is_enemy() { " enemy" } else { "" })
            }),
        );
        sync_pool(
            &self.document,
            &self.root,
            &mut self.power_ups,
            "power-up",
            state.power_ups.iter().map(|p| (p.id, p.rect, "")),
        );
        self.sync_explosions(state);
        self.apply_shake(dt_ms);
    }

    fn sync_boss(&mut self, state: &GameState) {
        let Some(boss) = &state.boss else {
            if let Some(el) = self.boss.take() {
                el.remove();
            }
            return;
        };

        if self.boss.is_none() {
            if let Some(el) = make_element(&self.document, "boss") {
                // Health bar rides inside the boss element
                if let Some(bar) = make_element(&self.document, "boss-health") {
                    let _ = el.append_child(&bar);
                }
                let _ = self.root.append_child(&el);
                self.boss = Some(el);
            }
        }

        if let Some(el) = &self.boss {
            place(el, boss.rect.pos.x, boss.rect.pos.y);
            size(el, boss.rect.size.x, boss.rect.size.y);
            if let Some(bar) = el.query_selector(".boss-health").ok().flatten() {
                let pct = (boss.health / boss.max_health * 100.0).clamp(0.0, 100.0);
                if let Ok(bar) = bar.dyn_into::<HtmlElement>() {
                    let _ = bar.style().set_property("width", &format!("{pct:.0}%"));
                }
            }
        }
    }

    fn sync_explosions(&mut self, state: &GameState) {
        let pool = &mut self.explosions;
        for explosion in &state.explosions {
            if !pool.contains_key(&explosion.id) {
                let class = match explosion.kind {
                    ExplosionKind::Blast => "explosion blast",
                    ExplosionKind::Flash => "explosion flash",
                };
                let Some(el) = make_element(&self.document, class) else {
                    continue;
                };
                let _ = self.root.append_child(&el);
                pool.insert(explosion.id, el);
            }
            let Some(el) = pool.get(&explosion.id) else { continue };
            place(el, explosion.pos.x - 32.0, explosion.pos.y - 32.0);
            // Fade with remaining life
            let max = match explosion.kind {
                ExplosionKind::Blast => crate::tuning::BLAST_LIFE_MS,
                ExplosionKind::Flash => crate::tuning::FLASH_LIFE_MS,
            };
            let opacity = (explosion.life_ms / max).clamp(0.0, 1.0);
            let _ = el.style().set_property("opacity", &format!("{opacity:.2}"));
        }
        retain_live(pool, state.explosions.iter().map(|e| e.id));
    }

    fn apply_shake(&mut self, dt_ms: f32) {
        if self.shake_left_ms <= 0.0 {
            return;
        }
        self.shake_left_ms -= dt_ms;
        let style = self.root.style();
        if self.shake_left_ms > 0.0 {
            let magnitude = 4.0 * self.shake_left_ms / SHAKE_MS;
            let phase = self.shake_left_ms * 0.15;
            let dx = phase.sin() * magnitude;
            let dy = phase.cos() * magnitude;
            let _ = style.set_property("transform", &format!("translate({dx:.1}px, {dy:.1}px)"));
        } else {
            let _ = style.remove_property("transform");
        }
    }

    /// Tear the stage down, removing every element it created
    pub fn clear(&mut self) {
        for (_, el) in self.chickens.drain() {
            el.remove();
        }
        for (_, el) in self.bullets.drain() {
            el.remove();
        }
        for (_, el) in self.power_ups.drain() {
            el.remove();
        }
        for (_, el) in self.explosions.drain() {
            el.remove();
        }
        if let Some(el) = self.boss.take() {
            el.remove();
        }
        let _ = self.root.style().remove_property("transform");
    }
}

/// Create/update/remove pooled elements for one entity class
fn sync_pool(
    document: &Document,
    root: &HtmlElement,
    pool: &mut HashMap<u32, HtmlElement>,
    base_class: &str,
    entities: impl Iterator<Item = (u32, crate::sim::Rect, &'static str)> + Clone,
) {
    for (id, rect, modifier) in entities.clone() {
        let el = match pool.get(&id) {
            Some(el) => el.clone(),
            None => {
                let class = format!("{base_class}{modifier}");
                let Some(el) = make_element(document, &class) else {
                    continue;
                };
                let _ = root.append_child(&el);
                size(&el, rect.size.x, rect.size.y);
                pool.insert(id, el.clone());
                el
            }
        };
        place(&el, rect.pos.x, rect.pos.y);
    }
    retain_live(pool, entities.map(|(id, _, _)| id));
}

/// Drop pool entries whose entity no longer exists
fn retain_live(pool: &mut HashMap<u32, HtmlElement>, live: impl Iterator<Item = u32>) {
    let live: std::collections::HashSet<u32> = live.collect();
    pool.retain(|id, el| {
        let keep = live.contains(id);
        if !keep {
            el.remove();
        }
        keep
    });
}

fn make_element(document: &Document, class: &str) -> Option<HtmlElement> {
    let el: Element = document.create_element("div").ok()?;
    el.set_class_name(class);
    el.dyn_into().ok()
}

fn place(el: &HtmlElement, x: f32, y: f32) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{x:.1}px"));
    let _ = style.set_property("top", &format!("{y:.1}px"));
}

fn size(el: &HtmlElement, w: f32, h: f32) {
    let style = el.style();
    let _ = style.set_property("width", &format!("{w:.0}px"));
    let _ = style.set_property("height", &format!("{h:.0}px"));
}
