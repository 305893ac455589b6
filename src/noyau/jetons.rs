// src/noyau/jetons.rs
//
// Modèle de jetons : genre + lexème + position.
// La catégorie de chaque genre est donnée par un match exhaustif (categorie()),
// pas par l’ordre des variantes : ajouter un genre oblige à le classer.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Littéraux
    Ident,   // x
    Decimal, // 3, 3.14, 1e-3
    Hex,     // 0xff
    Binary,  // 0b101
    Octal,   // 0o17

    // Arithmétique
    Add,      // +
    Sub,      // -
    Mul,      // *
    Div,      // /
    Pow,      // **
    Rem,      // %
    UnaryMin, // - (unaire, décidé au lexeur)

    // Bit à bit
    And, // &
    Or,  // |
    Xor, // ^
    Lsh, // <<
    Rsh, // >>
    Not, // ~

    // Comparaison
    EqEq,  // ==
    NotEq, // !=
    Gt,    // >
    GtEq,  // >=
    Lt,    // <
    LtEq,  // <=

    // Affectation
    Eq,    // =
    AddEq, // +=
    SubEq, // -=
    DivEq, // /=
    MulEq, // *=
    PowEq, // **=
    RemEq, // %=
    AndEq, // &=
    OrEq,  // |=
    XorEq, // ^=
    LshEq, // <<=
    RshEq, // >>=

    // Structure
    LParen, // (
    RParen, // )
    Comma,  // ,
    Eol,    // fin d’entrée
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    Litteral,
    Arithmetique,
    BitABit,
    Comparaison,
    Affectation,
    Structure,
}

impl TokenKind {
    pub fn categorie(self) -> Categorie {
        use TokenKind::*;

        match self {
            Ident | Decimal | Hex | Binary | Octal => Categorie::Litteral,
            Add | Sub | Mul | Div | Pow | Rem | UnaryMin => Categorie::Arithmetique,
            And | Or | Xor | Lsh | Rsh | Not => Categorie::BitABit,
            EqEq | NotEq | Gt | GtEq | Lt | LtEq => Categorie::Comparaison,
            Eq | AddEq | SubEq | DivEq | MulEq | PowEq | RemEq | AndEq | OrEq | XorEq | LshEq
            | RshEq => Categorie::Affectation,
            LParen | RParen | Comma | Eol => Categorie::Structure,
        }
    }

    /// Opérateur de base d’une affectation composée (`+=` -> `+`).
    /// None pour `=` et pour tout ce qui n’est pas une affectation.
    pub fn operation_de_base(self) -> Option<TokenKind> {
        use TokenKind::*;

        match self {
            AddEq => Some(Add),
            SubEq => Some(Sub),
            DivEq => Some(Div),
            MulEq => Some(Mul),
            PowEq => Some(Pow),
            RemEq => Some(Rem),
            AndEq => Some(And),
            OrEq => Some(Or),
            XorEq => Some(Xor),
            LshEq => Some(Lsh),
            RshEq => Some(Rsh),
            _ => None,
        }
    }

    /// Orthographe canonique (affichage, messages).
    pub fn symbole(self) -> &'static str {
        use TokenKind::*;

        match self {
            Ident => "identifiant",
            Decimal => "décimal",
            Hex => "hexadécimal",
            Binary => "binaire",
            Octal => "octal",
            Add => "+",
            Sub | UnaryMin => "-",
            Mul => "*",
            Div => "/",
            Pow => "**",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Lsh => "<<",
            Rsh => ">>",
            Not => "~",
            EqEq => "==",
            NotEq => "!=",
            Gt => ">",
            GtEq => ">=",
            Lt => "<",
            LtEq => "<=",
            Eq => "=",
            AddEq => "+=",
            SubEq => "-=",
            DivEq => "/=",
            MulEq => "*=",
            PowEq => "**=",
            RemEq => "%=",
            AndEq => "&=",
            OrEq => "|=",
            XorEq => "^=",
            LshEq => "<<=",
            RshEq => ">>=",
            LParen => "(",
            RParen => ")",
            Comma => ",",
            Eol => "fin de ligne",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbole())
    }
}

/// Jeton immuable produit par le lexeur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_literal(&self) -> bool {
        self.kind.categorie() == Categorie::Litteral
    }

    /// Tout opérateur : arithmétique, bit à bit, comparaison, affectation.
    pub fn is_operator(&self) -> bool {
        matches!(
            self.kind.categorie(),
            Categorie::Arithmetique
                | Categorie::BitABit
                | Categorie::Comparaison
                | Categorie::Affectation
        )
    }

    pub fn is_bitwise(&self) -> bool {
        self.kind.categorie() == Categorie::BitABit
    }

    pub fn is_assignment(&self) -> bool {
        self.kind.categorie() == Categorie::Affectation
    }
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
/// La fin de ligne n’est pas affichée ; le moins unaire est marqué `neg`.
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t.kind {
            TokenKind::Eol => continue,
            TokenKind::UnaryMin => "neg".to_string(),
            _ => t.lexeme.clone(),
        };
        out.push(s);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_predicats() {
        let x = Token::new(TokenKind::Ident, "x", 0);
        assert!(x.is_literal());
        assert!(!x.is_operator());

        let et = Token::new(TokenKind::And, "&", 2);
        assert!(et.is_operator() && et.is_bitwise());
        assert!(!et.is_assignment());

        let shl_eq = Token::new(TokenKind::LshEq, "<<=", 2);
        assert!(shl_eq.is_operator() && shl_eq.is_assignment());
        assert!(!shl_eq.is_bitwise());

        let neg = Token::new(TokenKind::UnaryMin, "-", 0);
        assert!(neg.is_operator());

        for k in [TokenKind::LParen, TokenKind::RParen, TokenKind::Comma, TokenKind::Eol] {
            let t = Token::new(k, "", 0);
            assert!(!t.is_operator() && !t.is_literal());
        }
    }

    #[test]
    fn affectations_composees() {
        assert_eq!(TokenKind::PowEq.operation_de_base(), Some(TokenKind::Pow));
        assert_eq!(TokenKind::RshEq.operation_de_base(), Some(TokenKind::Rsh));
        assert_eq!(TokenKind::Eq.operation_de_base(), None);
        assert_eq!(TokenKind::Add.operation_de_base(), None);
    }

    #[test]
    fn format_demarche() {
        let toks = vec![
            Token::new(TokenKind::UnaryMin, "-", 0),
            Token::new(TokenKind::Decimal, "2", 1),
            Token::new(TokenKind::Pow, "**", 3),
            Token::new(TokenKind::Ident, "x", 6),
            Token::new(TokenKind::Eol, "", 7),
        ];
        assert_eq!(format_tokens(&toks), "neg 2 ** x");
    }
}
