// src/noyau/operateurs.rs
//
// Table des opérateurs : précédence, associativité, arité.
// Table constante (match), jamais modifiée.

use super::jetons::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Gauche,
    Droite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Unaire,
    Binaire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operateur {
    pub precedence: u8,
    pub assoc: Assoc,
    pub arite: Arite,
}

const fn op(precedence: u8, assoc: Assoc, arite: Arite) -> Option<Operateur> {
    Some(Operateur {
        precedence,
        assoc,
        arite,
    })
}

/// Descripteur d’un genre de jeton ; None si ce n’est pas un opérateur.
pub const fn operateur(kind: TokenKind) -> Option<Operateur> {
    use Arite::*;
    use Assoc::*;
    use TokenKind::*;

    match kind {
        // Affectations
        Eq | AddEq | SubEq | DivEq | MulEq | PowEq | RemEq | AndEq | OrEq | XorEq | LshEq
        | RshEq => op(0, Droite, Binaire),

        // Comparaisons
        EqEq | NotEq | Gt | GtEq | Lt | LtEq => op(1, Droite, Binaire),

        // Bit à bit
        Or => op(2, Droite, Binaire),
        Xor => op(3, Droite, Binaire),
        And => op(4, Droite, Binaire),
        Lsh | Rsh => op(5, Droite, Binaire),
        Not => op(9, Gauche, Unaire),

        // Arithmétique
        Add | Sub => op(6, Gauche, Binaire),
        Mul | Div | Rem => op(7, Gauche, Binaire),
        Pow => op(8, Droite, Binaire), // 2 ** 3 ** 2 = 2 ** 9
        UnaryMin => op(10, Gauche, Unaire),

        Ident | Decimal | Hex | Binary | Octal | LParen | RParen | Comma | Eol => None,
    }
}

impl Operateur {
    pub fn is_unaire(&self) -> bool {
        self.arite == Arite::Unaire
    }

    /// `self` (au sommet de la pile) doit-il être réduit avant d’empiler `entrant` ?
    /// Oui si sa précédence est plus forte, ou égale et associatif à gauche.
    pub fn reduit_avant(&self, entrant: &Operateur) -> bool {
        self.precedence > entrant.precedence
            || (self.precedence == entrant.precedence && self.assoc == Assoc::Gauche)
    }
}
