use std::fmt;

use serde::Serialize;

/// Declared type of a handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Float,
    /// Passed through untouched.
    Any,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Int => f.write_str("int"),
            ParamKind::Float => f.write_str("float"),
            ParamKind::Any => f.write_str("any"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDefault {
    Int(i64),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<ParamDefault>,
}

impl Param {
    const fn any(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Any,
            default: None,
        }
    }

    const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: None,
        }
    }

    const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            default: None,
        }
    }

    const fn or(self, default: ParamDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if self.kind != ParamKind::Any {
            write!(f, ": {}", self.kind)?;
        }
        match self.default {
            Some(ParamDefault::Int(value)) => write!(f, " = {value}"),
            Some(ParamDefault::Null) => f.write_str(" = null"),
            None => Ok(()),
        }
    }
}

/// Handler signature shared by every name that aliases an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub handler: &'static str,
    pub params: &'static [Param],
}

impl Signature {
    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|param| param.is_required()).count()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.handler)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

/// Every operation the interpreter knows how to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    ShakeSet,
    Zoom,
    CharaLoad,
    #[serde(rename = "set_var")]
    SetVar,
    Background,
    Bgm,
    FadeIn,
    Motion,
    Hide,
    Chara,
    FadeOut,
    ShakeDisp,
    ShakeChara,
    Se2,
    Wait,
    SerifClose,
    Move,
    BgmStop,
    WipeOut,
    WipeIn,
    Shader,
    SetDispName,
    RemoveDispName,
    Effect,
    Voice,
}

const NULL: ParamDefault = ParamDefault::Null;

static SHAKESET: Signature = Signature {
    handler: "shakeset",
    params: &[
        Param::any("motion"),
        Param::int("a"),
        Param::int("b"),
        Param::int("c"),
        Param::int("d"),
    ],
};
static ZOOM: Signature = Signature {
    handler: "zoom",
    params: &[
        Param::float("zoom"),
        Param::any("position"),
        Param::int("x"),
        Param::int("y").or(ParamDefault::Int(0)),
    ],
};
static CHARALOAD: Signature = Signature {
    handler: "charaload",
    params: &[Param::any("chara")],
};
static SET_VAR: Signature = Signature {
    handler: "set_var",
    params: &[
        Param::any("name"),
        Param::any("value"),
        Param::int("shift").or(ParamDefault::Int(0)),
    ],
};
static BACKGROUND: Signature = Signature {
    handler: "background",
    params: &[Param::any("filename")],
};
static BGM: Signature = Signature {
    handler: "bgm",
    params: &[
        Param::any("filename"),
        Param::int("time").or(ParamDefault::Int(-1)),
    ],
};
static FADEIN: Signature = Signature {
    handler: "fadein",
    params: &[Param::int("speed")],
};
static MOTION: Signature = Signature {
    handler: "motion",
    params: &[
        Param::any("chara"),
        Param::any("motion"),
        Param::any("position").or(NULL),
        Param::int("a").or(ParamDefault::Int(0)),
    ],
};
static HIDE: Signature = Signature {
    handler: "hide",
    params: &[
        Param::any("chara"),
        Param::int("speed").or(ParamDefault::Int(0)),
    ],
};
static CHARA: Signature = Signature {
    handler: "chara",
    params: &[
        Param::any("chara"),
        Param::any("motion"),
        Param::any("position"),
        Param::int("x"),
        Param::int("y"),
    ],
};
static FADEOUT: Signature = Signature {
    handler: "fadeout",
    params: &[Param::any("color"), Param::int("speed")],
};
static SHAKEDISP: Signature = Signature {
    handler: "shakedisp",
    params: &[Param::any("motion")],
};
static SHAKECHARA: Signature = Signature {
    handler: "shakechara",
    params: &[Param::any("chara"), Param::any("motion")],
};
static SE2: Signature = Signature {
    handler: "se2",
    params: &[Param::any("filename"), Param::any("t").or(NULL)],
};
static WAIT: Signature = Signature {
    handler: "wait",
    params: &[Param::int("time")],
};
static SERIFCLOSE: Signature = Signature {
    handler: "serifclose",
    params: &[],
};
static MOVE: Signature = Signature {
    handler: "move",
    params: &[
        Param::any("chara"),
        Param::any("position"),
        Param::any("x"),
        Param::any("y"),
    ],
};
static BGMSTOP: Signature = Signature {
    handler: "bgmstop",
    params: &[Param::int("a").or(ParamDefault::Int(0))],
};
static WIPEOUT: Signature = Signature {
    handler: "wipeout",
    params: &[],
};
static WIPEIN: Signature = Signature {
    handler: "wipein",
    params: &[],
};
static SHADER: Signature = Signature {
    handler: "shader",
    params: &[
        Param::any("filename"),
        Param::int("a").or(ParamDefault::Int(0)),
    ],
};
static SETDISPNAME: Signature = Signature {
    handler: "setdispname",
    params: &[Param::any("name"), Param::any("chara")],
};
static REMOVEDISPNAME: Signature = Signature {
    handler: "removedispname",
    params: &[Param::any("name")],
};
static EFFECT: Signature = Signature {
    handler: "effect",
    params: &[Param::any("filename")],
};
static VOICE: Signature = Signature {
    handler: "voice",
    params: &[Param::any("filename")],
};

/// Script-level names in registration order. `bgm` and `bgm2` share a handler.
static NAMES: &[(&str, Opcode)] = &[
    ("charaload", Opcode::CharaLoad),
    ("変数", Opcode::SetVar),
    ("shakeset", Opcode::ShakeSet),
    ("背景", Opcode::Background),
    ("bgm2", Opcode::Bgm),
    ("bgm", Opcode::Bgm),
    ("fadein", Opcode::FadeIn),
    ("motion", Opcode::Motion),
    ("hide", Opcode::Hide),
    ("chara", Opcode::Chara),
    ("fadeout", Opcode::FadeOut),
    ("zoom", Opcode::Zoom),
    ("shakedisp", Opcode::ShakeDisp),
    ("shakechara", Opcode::ShakeChara),
    ("se2", Opcode::Se2),
    ("wait", Opcode::Wait),
    ("serifclose", Opcode::SerifClose),
    ("move", Opcode::Move),
    ("bgmstop", Opcode::BgmStop),
    ("wipeout", Opcode::WipeOut),
    ("wipein", Opcode::WipeIn),
    ("shader", Opcode::Shader),
    ("setdispname", Opcode::SetDispName),
    ("removedispname", Opcode::RemoveDispName),
    ("effect", Opcode::Effect),
    ("voice", Opcode::Voice),
];

impl Opcode {
    pub const ALL: [Opcode; 25] = [
        Opcode::ShakeSet,
        Opcode::Zoom,
        Opcode::CharaLoad,
        Opcode::SetVar,
        Opcode::Background,
        Opcode::Bgm,
        Opcode::FadeIn,
        Opcode::Motion,
        Opcode::Hide,
        Opcode::Chara,
        Opcode::FadeOut,
        Opcode::ShakeDisp,
        Opcode::ShakeChara,
        Opcode::Se2,
        Opcode::Wait,
        Opcode::SerifClose,
        Opcode::Move,
        Opcode::BgmStop,
        Opcode::WipeOut,
        Opcode::WipeIn,
        Opcode::Shader,
        Opcode::SetDispName,
        Opcode::RemoveDispName,
        Opcode::Effect,
        Opcode::Voice,
    ];

    /// Exact-match lookup of a script opcode name.
    pub fn lookup(name: &str) -> Option<Opcode> {
        NAMES
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|(_, opcode)| *opcode)
    }

    /// Every registered script name with the opcode it resolves to.
    pub fn names() -> &'static [(&'static str, Opcode)] {
        NAMES
    }

    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        NAMES
            .iter()
            .filter(move |(_, opcode)| *opcode == self)
            .map(|(name, _)| *name)
    }

    pub fn handler_name(self) -> &'static str {
        self.signature().handler
    }

    pub fn signature(self) -> &'static Signature {
        match self {
            Opcode::ShakeSet => &SHAKESET,
            Opcode::Zoom => &ZOOM,
            Opcode::CharaLoad => &CHARALOAD,
            Opcode::SetVar => &SET_VAR,
            Opcode::Background => &BACKGROUND,
            Opcode::Bgm => &BGM,
            Opcode::FadeIn => &FADEIN,
            Opcode::Motion => &MOTION,
            Opcode::Hide => &HIDE,
            Opcode::Chara => &CHARA,
            Opcode::FadeOut => &FADEOUT,
            Opcode::ShakeDisp => &SHAKEDISP,
            Opcode::ShakeChara => &SHAKECHARA,
            Opcode::Se2 => &SE2,
            Opcode::Wait => &WAIT,
            Opcode::SerifClose => &SERIFCLOSE,
            Opcode::Move => &MOVE,
            Opcode::BgmStop => &BGMSTOP,
            Opcode::WipeOut => &WIPEOUT,
            Opcode::WipeIn => &WIPEIN,
            Opcode::Shader => &SHADER,
            Opcode::SetDispName => &SETDISPNAME,
            Opcode::RemoveDispName => &REMOVEDISPNAME,
            Opcode::Effect => &EFFECT,
            Opcode::Voice => &VOICE,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Opcode::lookup("bgm"), Some(Opcode::Bgm));
        assert_eq!(Opcode::lookup("bgm2"), Some(Opcode::Bgm));
        assert_eq!(Opcode::lookup("変数"), Some(Opcode::SetVar));
        assert_eq!(Opcode::lookup("背景"), Some(Opcode::Background));
        assert_eq!(Opcode::lookup("BGM"), None);
        assert_eq!(Opcode::lookup("bg"), None);
        assert_eq!(Opcode::lookup(" wait"), None);
    }

    #[test]
    fn every_opcode_is_reachable_by_name() {
        for opcode in Opcode::ALL {
            assert!(
                opcode.aliases().next().is_some(),
                "{opcode:?} has no registered name"
            );
        }
        assert_eq!(Opcode::names().len(), Opcode::ALL.len() + 1);
    }

    #[test]
    fn signatures_render_with_types_and_defaults() {
        assert_eq!(
            Opcode::Zoom.signature().to_string(),
            "zoom(zoom: float, position, x: int, y: int = 0)"
        );
        assert_eq!(
            Opcode::Motion.signature().to_string(),
            "motion(chara, motion, position = null, a: int = 0)"
        );
        assert_eq!(Opcode::SerifClose.signature().to_string(), "serifclose()");
        assert_eq!(Opcode::Bgm.signature().required_count(), 1);
    }

    #[test]
    fn bgm_aliases_share_one_signature() {
        let aliases: Vec<&str> = Opcode::Bgm.aliases().collect();
        assert_eq!(aliases, vec!["bgm2", "bgm"]);
    }

    #[test]
    fn serializes_as_handler_name() {
        for opcode in Opcode::ALL {
            assert_eq!(
                serde_json::to_value(opcode).expect("json"),
                serde_json::json!(opcode.handler_name())
            );
        }
        assert_eq!(
            serde_json::to_value(Opcode::ShakeSet).expect("json"),
            serde_json::json!("shakeset")
        );
    }
}
