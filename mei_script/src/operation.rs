use serde::Serialize;

use crate::binder::{Arg, Binding};
use crate::registry::Opcode;

/// A registered command with its arguments bound to named fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    ShakeSet {
        motion: Arg,
        a: Arg,
        b: Arg,
        c: Arg,
        d: Arg,
    },
    Zoom {
        zoom: Arg,
        position: Arg,
        x: Arg,
        y: Arg,
    },
    CharaLoad {
        chara: Arg,
    },
    #[serde(rename = "set_var")]
    SetVar {
        name: Arg,
        value: Arg,
        shift: Arg,
    },
    Background {
        filename: Arg,
    },
    Bgm {
        filename: Arg,
        time: Arg,
    },
    FadeIn {
        speed: Arg,
    },
    Motion {
        chara: Arg,
        motion: Arg,
        position: Arg,
        a: Arg,
    },
    Hide {
        chara: Arg,
        speed: Arg,
    },
    Chara {
        chara: Arg,
        motion: Arg,
        position: Arg,
        x: Arg,
        y: Arg,
    },
    FadeOut {
        color: Arg,
        speed: Arg,
    },
    ShakeDisp {
        motion: Arg,
    },
    ShakeChara {
        chara: Arg,
        motion: Arg,
    },
    Se2 {
        filename: Arg,
        t: Arg,
    },
    Wait {
        time: Arg,
    },
    SerifClose,
    Move {
        chara: Arg,
        position: Arg,
        x: Arg,
        y: Arg,
    },
    BgmStop {
        a: Arg,
    },
    WipeOut,
    WipeIn,
    Shader {
        filename: Arg,
        a: Arg,
    },
    SetDispName {
        name: Arg,
        chara: Arg,
    },
    RemoveDispName {
        name: Arg,
    },
    Effect {
        filename: Arg,
    },
    Voice {
        filename: Arg,
    },
}

impl Operation {
    /// Move a successful binding's values into the matching variant.
    pub fn from_binding(binding: Binding) -> Self {
        let mut values = binding.values.into_iter();
        let mut next = move || values.next().unwrap_or_else(Arg::null);
        match binding.opcode {
            Opcode::ShakeSet => Operation::ShakeSet {
                motion: next(),
                a: next(),
                b: next(),
                c: next(),
                d: next(),
            },
            Opcode::Zoom => Operation::Zoom {
                zoom: next(),
                position: next(),
                x: next(),
                y: next(),
            },
            Opcode::CharaLoad => Operation::CharaLoad { chara: next() },
            Opcode::SetVar => Operation::SetVar {
                name: next(),
                value: next(),
                shift: next(),
            },
            Opcode::Background => Operation::Background { filename: next() },
            Opcode::Bgm => Operation::Bgm {
                filename: next(),
                time: next(),
            },
            Opcode::FadeIn => Operation::FadeIn { speed: next() },
            Opcode::Motion => Operation::Motion {
                chara: next(),
                motion: next(),
                position: next(),
                a: next(),
            },
            Opcode::Hide => Operation::Hide {
                chara: next(),
                speed: next(),
            },
            Opcode::Chara => Operation::Chara {
                chara: next(),
                motion: next(),
                position: next(),
                x: next(),
                y: next(),
            },
            Opcode::FadeOut => Operation::FadeOut {
                color: next(),
                speed: next(),
            },
            Opcode::ShakeDisp => Operation::ShakeDisp { motion: next() },
            Opcode::ShakeChara => Operation::ShakeChara {
                chara: next(),
                motion: next(),
            },
            Opcode::Se2 => Operation::Se2 {
                filename: next(),
                t: next(),
            },
            Opcode::Wait => Operation::Wait { time: next() },
            Opcode::SerifClose => Operation::SerifClose,
            Opcode::Move => Operation::Move {
                chara: next(),
                position: next(),
                x: next(),
                y: next(),
            },
            Opcode::BgmStop => Operation::BgmStop { a: next() },
            Opcode::WipeOut => Operation::WipeOut,
            Opcode::WipeIn => Operation::WipeIn,
            Opcode::Shader => Operation::Shader {
                filename: next(),
                a: next(),
            },
            Opcode::SetDispName => Operation::SetDispName {
                name: next(),
                chara: next(),
            },
            Opcode::RemoveDispName => Operation::RemoveDispName { name: next() },
            Opcode::Effect => Operation::Effect { filename: next() },
            Opcode::Voice => Operation::Voice { filename: next() },
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Operation::ShakeSet { .. } => Opcode::ShakeSet,
            Operation::Zoom { .. } => Opcode::Zoom,
            Operation::CharaLoad { .. } => Opcode::CharaLoad,
            Operation::SetVar { .. } => Opcode::SetVar,
            Operation::Background { .. } => Opcode::Background,
            Operation::Bgm { .. } => Opcode::Bgm,
            Operation::FadeIn { .. } => Opcode::FadeIn,
            Operation::Motion { .. } => Opcode::Motion,
            Operation::Hide { .. } => Opcode::Hide,
            Operation::Chara { .. } => Opcode::Chara,
            Operation::FadeOut { .. } => Opcode::FadeOut,
            Operation::ShakeDisp { .. } => Opcode::ShakeDisp,
            Operation::ShakeChara { .. } => Opcode::ShakeChara,
            Operation::Se2 { .. } => Opcode::Se2,
            Operation::Wait { .. } => Opcode::Wait,
            Operation::SerifClose => Opcode::SerifClose,
            Operation::Move { .. } => Opcode::Move,
            Operation::BgmStop { .. } => Opcode::BgmStop,
            Operation::WipeOut => Opcode::WipeOut,
            Operation::WipeIn => Opcode::WipeIn,
            Operation::Shader { .. } => Opcode::Shader,
            Operation::SetDispName { .. } => Opcode::SetDispName,
            Operation::RemoveDispName { .. } => Opcode::RemoveDispName,
            Operation::Effect { .. } => Opcode::Effect,
            Operation::Voice { .. } => Opcode::Voice,
        }
    }
}
