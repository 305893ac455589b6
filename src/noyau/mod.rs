//! Noyau du langage d’expressions (rationnels exacts)
//!
//! Organisation interne :
//! - jetons.rs      : modèle de jetons (genre, lexème, position) + catégories
//! - lexeur.rs      : texte -> jetons (moins unaire décidé ici)
//! - operateurs.rs  : table précédence / associativité / arité
//! - rationnel.rs   : couche numérique BigRational
//! - fonctions.rs   : registre des fonctions prédéfinies
//! - constantes.rs  : pi, tau, phi, e, true, false
//! - evaluateur.rs  : shunting-yard à la volée + environnement persistant
//! - format.rs      : rendu décimal / hex / binaire / octal
//! - erreur.rs      : taxonomie des erreurs

pub mod constantes;
pub mod erreur;
pub mod evaluateur;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod lexeur;
pub mod operateurs;
pub mod rationnel;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use erreur::{CalcError, ErreurNumerique};
pub use evaluateur::{evaluate, exec_with, Demarche, Evaluator};
pub use format::{format_fraction, formater, ModeSortie};
pub use jetons::{Token, TokenKind};
pub use lexeur::lex;
