// src/noyau/erreur.rs
//
// Erreurs du noyau.
// - CalcError        : erreur publique d’une évaluation (toujours terminale)
// - ErreurNumerique  : échec d’une opération rationnelle, sans contexte source
//
// Les positions sont des index de caractère dans l’expression d’origine.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Caractère inconnu, `!` isolé, littéral mal formé.
    #[error("erreur lexicale à la position {position} : {message}")]
    Lexicale { message: String, position: usize },

    /// Parenthèses non appariées, virgule mal placée, opérande manquant ou en trop.
    #[error("erreur de syntaxe à la position {position} : {message}")]
    Syntaxe { message: String, position: usize },

    #[error("variable indéfinie ‘{nom}’ (position {position})")]
    VariableIndefinie { nom: String, position: usize },

    #[error("fonction indéfinie ‘{nom}’ (position {position})")]
    FonctionIndefinie { nom: String, position: usize },

    #[error("‘{nom}’ attend {attendu} argument(s), {recu} reçu(s) (position {position})")]
    Arite {
        nom: String,
        attendu: usize,
        recu: usize,
        position: usize,
    },

    /// Opérateur bit à bit appliqué à un rationnel non entier.
    #[error("l’opérateur ‘{operateur}’ exige des entiers (position {position})")]
    Type { operateur: String, position: usize },

    #[error("‘{operateur}’ : {source} (position {position})")]
    Arithmetique {
        operateur: String,
        position: usize,
        #[source]
        source: ErreurNumerique,
    },

    #[error("impossible d’affecter à un littéral (position {position})")]
    Affectation { position: usize },

    #[error("nom de variable invalide ‘{nom}’")]
    NomInvalide { nom: String },
}

impl CalcError {
    /// Position source de l’erreur (None pour NomInvalide, détectée avant l’évaluation).
    pub fn position(&self) -> Option<usize> {
        use CalcError::*;

        match self {
            Lexicale { position, .. }
            | Syntaxe { position, .. }
            | VariableIndefinie { position, .. }
            | FonctionIndefinie { position, .. }
            | Arite { position, .. }
            | Type { position, .. }
            | Arithmetique { position, .. }
            | Affectation { position } => Some(*position),
            NomInvalide { .. } => None,
        }
    }

    pub(crate) fn syntaxe(message: impl Into<String>, position: usize) -> Self {
        CalcError::Syntaxe {
            message: message.into(),
            position,
        }
    }

    /// Relève une erreur numérique au niveau de l’opérateur (ou fonction) qui l’a produite.
    pub(crate) fn depuis_numerique(err: ErreurNumerique, operateur: &str, position: usize) -> Self {
        match err {
            ErreurNumerique::NonEntier => CalcError::Type {
                operateur: operateur.to_string(),
                position,
            },
            source => CalcError::Arithmetique {
                operateur: operateur.to_string(),
                position,
                source,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurNumerique {
    #[error("division par zéro")]
    DivisionParZero,

    #[error("opérande non entier")]
    NonEntier,

    #[error("résultat non fini (hors domaine)")]
    NonFini,

    #[error("exposant trop grand")]
    ExposantTropGrand,

    #[error("décalage trop grand")]
    DecalageTropGrand,

    #[error("argument trop grand")]
    ArgumentTropGrand,
}
