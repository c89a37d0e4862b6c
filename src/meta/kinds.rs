//! Entity kind metadata tables
//!
//! One immutable descriptor per entity kind: collision geometry, sprite
//! sheet layout, damage, and health. Built once at startup and shared by
//! reference for the life of the process.

use crate::core::types::{Action, HitBox, ACTION_COUNT};

/// Every concrete entity kind in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindId {
    /// Player character
    Guy,
    Fireball,
    /// Fireball trail particle
    FireballTrail,
    Iceshock,
    /// Small ice shard launched alongside each iceshock missile
    IceshockShard,
    Rockfall,
    /// Large rock debris from a rockfall impact
    RockChunk,
    /// Small rock debris from a rockfall impact
    RockDust,
    Darkedge,
    /// Darkedge trail particle
    DarkedgeTrail,
    Arcsurge,
    /// Spark emitted by an arcsurge discharge
    ArcsurgeSpark,
}

pub const KIND_COUNT: usize = 12;

impl KindId {
    pub const ALL: [KindId; KIND_COUNT] = [
        KindId::Guy,
        KindId::Fireball,
        KindId::FireballTrail,
        KindId::Iceshock,
        KindId::IceshockShard,
        KindId::Rockfall,
        KindId::RockChunk,
        KindId::RockDust,
        KindId::Darkedge,
        KindId::DarkedgeTrail,
        KindId::Arcsurge,
        KindId::ArcsurgeSpark,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Collision and terrain-response policy class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Humanoid,
    Spell,
    Particle,
}

/// Half-open animation frame range `[start, end)` on the sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
}

impl FrameRange {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Frame ranges for every action state of one kind
///
/// Non-humanoid kinds only ever enter Spawn/Move/Collide; their remaining
/// slots alias the Move range so lookups stay total.
#[derive(Debug, Clone)]
pub struct FrameTable {
    ranges: [FrameRange; ACTION_COUNT],
}

impl FrameTable {
    fn uniform(start: u32, end: u32) -> Self {
        Self { ranges: [FrameRange { start, end }; ACTION_COUNT] }
    }

    fn with(mut self, action: Action, start: u32, end: u32) -> Self {
        self.ranges[action.index()] = FrameRange { start, end };
        self
    }

    pub fn get(&self, action: Action) -> FrameRange {
        self.ranges[action.index()]
    }
}

/// Immutable stats shared by all entities of one kind
#[derive(Debug, Clone)]
pub struct KindInfo {
    pub id: KindId,
    pub category: Category,
    /// Sprite cell width in pixels
    pub width: f64,
    /// Sprite cell height in pixels
    pub height: f64,
    /// Bounding-circle radius (half-diagonal of the cell), for the
    /// broad-phase collision test
    pub radius: f64,
    /// Narrow-phase hitboxes while facing right
    pub bounds_right: Vec<HitBox>,
    /// The same boxes mirrored for facing left
    pub bounds_left: Vec<HitBox>,
    /// y-offset of this kind's row on the shared sprite sheet
    pub sheet_row: u32,
    pub frames: FrameTable,
    /// Damage dealt to whatever this kind collides with
    pub power: i32,
    /// Starting health (1 acts as a one-hit-kill sentinel for
    /// spells and particles)
    pub max_health: i32,
}

impl KindInfo {
    fn new(
        id: KindId,
        category: Category,
        power: i32,
        max_health: i32,
        width: f64,
        height: f64,
        sheet_row: u32,
        frames: FrameTable,
        bounds: Vec<HitBox>,
    ) -> Self {
        let radius = ((width * width + height * height) / 4.0).sqrt();
        let bounds_left = bounds.iter().map(|b| b.mirrored(width)).collect();
        Self {
            id,
            category,
            width,
            height,
            radius,
            bounds_right: bounds,
            bounds_left,
            sheet_row,
            frames,
            power,
            max_health,
        }
    }

    pub fn bounds(&self, facing: crate::core::types::Facing) -> &[HitBox] {
        match facing {
            crate::core::types::Facing::Right => &self.bounds_right,
            crate::core::types::Facing::Left => &self.bounds_left,
        }
    }
}

/// The load-once table of all kind descriptors, indexed by `KindId`
#[derive(Debug)]
pub struct KindTable {
    kinds: Vec<KindInfo>,
}

impl KindTable {
    pub fn load() -> Self {
        let mut kinds = Vec::with_capacity(KIND_COUNT);

        // Player character: four-frame walk cycle, long cast sections
        kinds.push(KindInfo::new(
            KindId::Guy,
            Category::Humanoid,
            10,
            100,
            28.0,
            58.0,
            0,
            FrameTable::uniform(0, 0)
                .with(Action::Move, 0, 4)
                .with(Action::Collide, 4, 5)
                .with(Action::Idle, 5, 10)
                .with(Action::Jump, 10, 14)
                .with(Action::Die, 14, 22)
                .with(Action::CastFireball, 22, 30)
                .with(Action::CastIceshock, 30, 40)
                .with(Action::CastRockfall, 40, 51)
                .with(Action::CastDarkedge, 51, 64)
                .with(Action::CastArcsurge, 64, 69),
            vec![HitBox::new(9.0, 5.0, 15.0, 14.0), HitBox::new(10.0, 23.0, 10.0, 35.0)],
        ));

        kinds.push(KindInfo::new(
            KindId::Fireball,
            Category::Spell,
            15,
            1,
            23.0,
            10.0,
            60,
            FrameTable::uniform(0, 2)
                .with(Action::Spawn, 0, 0)
                .with(Action::Collide, 2, 5),
            vec![HitBox::new(6.0, 2.0, 12.0, 6.0)],
        ));

        kinds.push(KindInfo::new(
            KindId::FireballTrail,
            Category::Particle,
            0,
            1,
            5.0,
            5.0,
            315,
            FrameTable::uniform(0, 2).with(Action::Spawn, 0, 0).with(Action::Collide, 2, 2),
            Vec::new(),
        ));

        kinds.push(KindInfo::new(
            KindId::Iceshock,
            Category::Spell,
            20,
            1,
            23.0,
            10.0,
            70,
            FrameTable::uniform(0, 2)
                .with(Action::Spawn, 0, 0)
                .with(Action::Collide, 2, 5),
            vec![HitBox::new(6.0, 1.0, 13.0, 7.0)],
        ));

        kinds.push(KindInfo::new(
            KindId::IceshockShard,
            Category::Particle,
            0,
            1,
            5.0,
            5.0,
            80,
            FrameTable::uniform(0, 2).with(Action::Spawn, 0, 0).with(Action::Collide, 2, 2),
            Vec::new(),
        ));

        // Rockfall is the one spell with a real spawn animation (the rock
        // shimmers in above the target before dropping)
        kinds.push(KindInfo::new(
            KindId::Rockfall,
            Category::Spell,
            30,
            1,
            100.0,
            100.0,
            85,
            FrameTable::uniform(3, 4)
                .with(Action::Spawn, 0, 3)
                .with(Action::Collide, 4, 7),
            vec![
                HitBox::new(40.0, 5.0, 20.0, 90.0),
                HitBox::new(20.0, 20.0, 60.0, 60.0),
                HitBox::new(5.0, 40.0, 90.0, 20.0),
            ],
        ));

        kinds.push(KindInfo::new(
            KindId::RockChunk,
            Category::Particle,
            0,
            1,
            25.0,
            25.0,
            185,
            FrameTable::uniform(0, 1).with(Action::Spawn, 0, 0).with(Action::Collide, 1, 1),
            Vec::new(),
        ));

        kinds.push(KindInfo::new(
            KindId::RockDust,
            Category::Particle,
            0,
            1,
            5.0,
            5.0,
            210,
            FrameTable::uniform(0, 2).with(Action::Spawn, 0, 0).with(Action::Collide, 2, 2),
            Vec::new(),
        ));

        kinds.push(KindInfo::new(
            KindId::Darkedge,
            Category::Spell,
            25,
            1,
            60.0,
            30.0,
            215,
            FrameTable::uniform(5, 8)
                .with(Action::Spawn, 0, 5)
                .with(Action::Collide, 8, 11),
            vec![HitBox::new(5.0, 8.0, 25.0, 10.0), HitBox::new(30.0, 15.0, 25.0, 10.0)],
        ));

        kinds.push(KindInfo::new(
            KindId::DarkedgeTrail,
            Category::Particle,
            0,
            1,
            5.0,
            5.0,
            245,
            FrameTable::uniform(0, 2).with(Action::Spawn, 0, 0).with(Action::Collide, 2, 2),
            Vec::new(),
        ));

        // Arcsurge has an empty collide section: the discharge ignores
        // impacts and simply expires
        kinds.push(KindInfo::new(
            KindId::Arcsurge,
            Category::Spell,
            35,
            1,
            120.0,
            60.0,
            250,
            FrameTable::uniform(0, 3)
                .with(Action::Spawn, 0, 0)
                .with(Action::Collide, 3, 3),
            vec![HitBox::new(5.0, 20.0, 92.0, 20.0)],
        ));

        kinds.push(KindInfo::new(
            KindId::ArcsurgeSpark,
            Category::Particle,
            0,
            1,
            5.0,
            5.0,
            310,
            FrameTable::uniform(0, 2).with(Action::Spawn, 0, 0).with(Action::Collide, 2, 2),
            Vec::new(),
        ));

        debug_assert!(kinds.iter().enumerate().all(|(i, k)| k.id.index() == i));
        Self { kinds }
    }

    pub fn get(&self, id: KindId) -> &KindInfo {
        &self.kinds[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &KindInfo> {
        self.kinds.iter()
    }
}
