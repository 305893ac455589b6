// src/noyau/evaluateur.rs
//
// Évaluateur : shunting-yard à la volée, une passe, sans AST.
// - pile d’opérandes  : jeton en attente (littéral / identifiant) ou valeur calculée
// - pile d’opérateurs : opérateurs, `(`, marqueurs d’appel (littéral suivi de `(`)
// - pile d’arités     : une entrée par appel ouvert
//
// Les affectations sont validées au fil de l’eau : une erreur plus loin
// dans l’expression ne défait pas celles déjà réduites.

use std::collections::HashMap;

use num_rational::BigRational;
use num_traits::Zero;
use tracing::{debug, trace};

use super::constantes::constantes;
use super::erreur::CalcError;
use super::fonctions::fonction;
use super::format::format_fraction;
use super::jetons::{format_tokens, Token, TokenKind};
use super::lexeur::{is_valid_ident, lex};
use super::operateurs::{operateur, Operateur};
use super::rationnel::{
    comparer, decalage_droite, decalage_gauche, depuis_bool, diviser, et, modulo, non, ou,
    ou_exclusif, parse_decimal, parse_radix, puissance, Resultat,
};

/* ------------------------ État de travail ------------------------ */

#[derive(Clone, Debug)]
enum Operande {
    /// Résolu à la demande (une affectation `=` garde le nom sans le lire).
    EnAttente(Token),
    Valeur(BigRational),
}

#[derive(Default, Debug)]
struct Piles {
    operandes: Vec<Operande>,
    operateurs: Vec<Token>,
    arites: Vec<usize>,
}

impl Piles {
    fn vider(&mut self) {
        self.operandes.clear();
        self.operateurs.clear();
        self.arites.clear();
    }
}

/// Démarche d’une évaluation : jetons lus et réductions effectuées.
#[derive(Clone, Debug, PartialEq)]
pub struct Demarche {
    pub resultat: BigRational,
    pub jetons: String,
    pub etapes: Vec<String>,
}

/* ------------------------ API publique ------------------------ */

/// Évaluateur persistant : l’environnement survit d’un `run` à l’autre.
/// Pas de verrou interne : un appel à la fois par instance.
#[derive(Debug)]
pub struct Evaluator {
    variables: HashMap<String, BigRational>,
    piles: Piles,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Nouvel évaluateur, amorcé avec les constantes prédéfinies.
    pub fn new() -> Self {
        Self {
            variables: constantes()
                .iter()
                .map(|(nom, v)| (nom.to_string(), v.clone()))
                .collect(),
            piles: Piles::default(),
        }
    }

    /// Évalue `expr` contre l’environnement de l’instance (qui peut être modifié).
    pub fn run(&mut self, expr: &str) -> Result<BigRational, CalcError> {
        let tokens = lex(expr)?;
        self.executer(expr, &tokens, None)
    }

    /// Comme `run`, avec la liste des jetons et des réductions.
    pub fn run_detaille(&mut self, expr: &str) -> Result<Demarche, CalcError> {
        let tokens = lex(expr)?;
        let mut etapes = Vec::new();
        let resultat = self.executer(expr, &tokens, Some(&mut etapes))?;
        Ok(Demarche {
            resultat,
            jetons: format_tokens(&tokens),
            etapes,
        })
    }

    pub fn get_variable(&self, nom: &str) -> Result<BigRational, CalcError> {
        self.variables
            .get(nom)
            .cloned()
            .ok_or_else(|| CalcError::VariableIndefinie {
                nom: nom.to_string(),
                position: 0,
            })
    }

    pub fn set_variable(&mut self, nom: &str, valeur: BigRational) -> Result<(), CalcError> {
        if !is_valid_ident(nom) {
            return Err(CalcError::NomInvalide {
                nom: nom.to_string(),
            });
        }
        self.variables.insert(nom.to_string(), valeur);
        Ok(())
    }

    /// Oublie les variables utilisateur ; seules les constantes restent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Variables connues, triées par nom.
    pub fn variables(&self) -> Vec<(&str, &BigRational)> {
        let mut v: Vec<_> = self
            .variables
            .iter()
            .map(|(nom, valeur)| (nom.as_str(), valeur))
            .collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }

    fn executer(
        &mut self,
        expr: &str,
        tokens: &[Token],
        etapes: Option<&mut Vec<String>>,
    ) -> Result<BigRational, CalcError> {
        self.piles.vider();
        let mut passe = Passe {
            tokens,
            variables: &mut self.variables,
            piles: &mut self.piles,
            etapes,
        };
        let res = passe.evaluer();
        let jetons = tokens.len();
        match &res {
            Ok(v) => debug!(expr = %expr, jetons, resultat = %format_fraction(v), "évaluation"),
            Err(e) => debug!(expr = %expr, jetons, erreur = %e, "évaluation échouée"),
        }
        res
    }
}

/// Évaluation ponctuelle : constantes seules, rien n’est conservé.
pub fn evaluate(expr: &str) -> Result<BigRational, CalcError> {
    Evaluator::new().run(expr)
}

/// Évaluation ponctuelle avec des variables supplémentaires.
/// Chaque nom doit être un identifiant valide, sinon rien n’est évalué.
pub fn exec_with(
    expr: &str,
    variables: &HashMap<String, BigRational>,
) -> Result<BigRational, CalcError> {
    let mut ev = Evaluator::new();
    for (nom, valeur) in variables {
        ev.set_variable(nom, valeur.clone())?;
    }
    ev.run(expr)
}

/* ------------------------ Passe ------------------------ */

struct Passe<'a> {
    tokens: &'a [Token],
    variables: &'a mut HashMap<String, BigRational>,
    piles: &'a mut Piles,
    etapes: Option<&'a mut Vec<String>>,
}

/// Le sommet de pile doit-il être réduit avant d’empiler `entrant` ?
/// Un appel en attente se réduit toujours ; `(` bloque.
fn doit_reduire(sommet: &Token, entrant: &Operateur) -> bool {
    if sommet.is_literal() {
        return true;
    }
    operateur(sommet.kind).is_some_and(|op| op.reduit_avant(entrant))
}

fn virgule_mal_placee(tok: &Token) -> CalcError {
    CalcError::syntaxe("virgule mal placée", tok.offset)
}

impl Passe<'_> {
    fn evaluer(&mut self) -> Result<BigRational, CalcError> {
        let tokens = self.tokens;

        for (i, tok) in tokens.iter().enumerate() {
            if tok.is_literal() {
                if tokens.get(i + 1).is_some_and(|t| t.is(TokenKind::LParen)) {
                    // appel : arité 0 pour `f()`, sinon 1 (+1 par virgule)
                    let vide = tokens.get(i + 2).is_some_and(|t| t.is(TokenKind::RParen));
                    self.piles.arites.push(if vide { 0 } else { 1 });
                    self.piles.operateurs.push(tok.clone());
                } else {
                    self.piles.operandes.push(Operande::EnAttente(tok.clone()));
                }
                continue;
            }

            match tok.kind {
                TokenKind::LParen => self.piles.operateurs.push(tok.clone()),
                TokenKind::RParen => self.fermer(tok)?,
                TokenKind::Comma => self.virgule(i, tok)?,
                TokenKind::Eol => break,
                _ => self.empiler_operateur(tok)?,
            }
        }

        self.vider()?;
        self.resultat()
    }

    fn empiler_operateur(&mut self, tok: &Token) -> Result<(), CalcError> {
        let Some(entrant) = operateur(tok.kind) else {
            return Err(CalcError::syntaxe(
                format!("jeton inattendu ‘{}’", tok.lexeme),
                tok.offset,
            ));
        };

        // un préfixe unaire n’a pas encore d’opérande : rien à réduire
        if !entrant.is_unaire() {
            while self
                .piles
                .operateurs
                .last()
                .is_some_and(|sommet| doit_reduire(sommet, &entrant))
            {
                let Some(sommet) = self.piles.operateurs.pop() else {
                    break;
                };
                self.reduire(sommet)?;
            }
        }

        self.piles.operateurs.push(tok.clone());
        Ok(())
    }

    fn virgule(&mut self, i: usize, tok: &Token) -> Result<(), CalcError> {
        let avant = i.checked_sub(1).and_then(|j| self.tokens.get(j));
        let apres = self.tokens.get(i + 1);
        if avant.is_none_or(|t| t.is(TokenKind::LParen) || t.is(TokenKind::Comma))
            || apres.is_some_and(|t| t.is(TokenKind::RParen))
        {
            return Err(virgule_mal_placee(tok));
        }

        loop {
            let Some(sommet) = self.piles.operateurs.last() else {
                return Err(virgule_mal_placee(tok));
            };
            if sommet.is(TokenKind::LParen) {
                break;
            }
            if let Some(sommet) = self.piles.operateurs.pop() {
                self.reduire(sommet)?;
            }
        }

        // la `(` exposée doit ouvrir un appel
        let n = self.piles.operateurs.len();
        let appel = n >= 2 && self.piles.operateurs[n - 2].is_literal();
        match self.piles.arites.last_mut() {
            Some(arite) if appel => {
                *arite += 1;
                Ok(())
            }
            _ => Err(virgule_mal_placee(tok)),
        }
    }

    fn fermer(&mut self, tok: &Token) -> Result<(), CalcError> {
        loop {
            match self.piles.operateurs.pop() {
                None => {
                    return Err(CalcError::syntaxe(
                        "parenthèse fermante sans ouvrante",
                        tok.offset,
                    ))
                }
                Some(t) if t.is(TokenKind::LParen) => return Ok(()),
                Some(t) => self.reduire(t)?,
            }
        }
    }

    fn vider(&mut self) -> Result<(), CalcError> {
        while let Some(t) = self.piles.operateurs.pop() {
            if t.is(TokenKind::LParen) {
                return Err(CalcError::syntaxe("parenthèse ouvrante non fermée", t.offset));
            }
            self.reduire(t)?;
        }
        Ok(())
    }

    fn resultat(&mut self) -> Result<BigRational, CalcError> {
        match self.piles.operandes.len() {
            0 => Ok(BigRational::zero()),
            1 => match self.piles.operandes.pop() {
                Some(o) => self.resoudre(o),
                None => Ok(BigRational::zero()),
            },
            _ => {
                let position = self
                    .piles
                    .operandes
                    .iter()
                    .skip(1)
                    .find_map(|o| match o {
                        Operande::EnAttente(t) => Some(t.offset),
                        Operande::Valeur(_) => None,
                    })
                    .or_else(|| self.tokens.last().map(|t| t.offset))
                    .unwrap_or(0);
                Err(CalcError::syntaxe("jeton inattendu", position))
            }
        }
    }

    /* ------------------------ Réductions ------------------------ */

    fn noter(&mut self, etape: impl FnOnce() -> String) {
        if let Some(etapes) = self.etapes.as_deref_mut() {
            etapes.push(etape());
        }
    }

    fn depiler(&mut self, tok: &Token) -> Result<Operande, CalcError> {
        self.piles.operandes.pop().ok_or_else(|| {
            CalcError::syntaxe(format!("opérande manquant pour ‘{}’", tok.lexeme), tok.offset)
        })
    }

    fn reduire(&mut self, tok: Token) -> Result<(), CalcError> {
        if tok.is_literal() {
            return self.appeler(tok);
        }
        let Some(op) = operateur(tok.kind) else {
            return Err(CalcError::syntaxe(
                format!("jeton inattendu ‘{}’", tok.lexeme),
                tok.offset,
            ));
        };
        let leve = |e| CalcError::depuis_numerique(e, &tok.lexeme, tok.offset);

        let droite = self.depiler(&tok)?;
        let b = self.resoudre(droite)?;

        let r = if op.is_unaire() {
            let r = unaire(tok.kind, &b).map_err(leve)?;
            self.noter(|| {
                format!(
                    "{} {} → {}",
                    nom_operateur(&tok),
                    format_fraction(&b),
                    format_fraction(&r)
                )
            });
            r
        } else if tok.is_assignment() {
            let cible = match self.depiler(&tok)? {
                Operande::EnAttente(t) if t.is(TokenKind::Ident) => t,
                _ => return Err(CalcError::Affectation { position: tok.offset }),
            };
            let r = match tok.kind.operation_de_base() {
                None => b,
                Some(base) => {
                    let a = self.chercher(&cible)?;
                    binaire(base, &a, &b).map_err(leve)?
                }
            };
            trace!(variable = %cible.lexeme, valeur = %format_fraction(&r), "affectation");
            self.variables.insert(cible.lexeme.clone(), r.clone());
            self.noter(|| format!("{} {} {}", cible.lexeme, tok.lexeme, format_fraction(&r)));
            r
        } else {
            let gauche = self.depiler(&tok)?;
            let a = self.resoudre(gauche)?;
            let r = binaire(tok.kind, &a, &b).map_err(leve)?;
            self.noter(|| {
                format!(
                    "{} {} {} → {}",
                    format_fraction(&a),
                    tok.lexeme,
                    format_fraction(&b),
                    format_fraction(&r)
                )
            });
            r
        };

        trace!(operateur = %tok.lexeme, resultat = %format_fraction(&r), "réduction");
        self.piles.operandes.push(Operande::Valeur(r));
        Ok(())
    }

    fn appeler(&mut self, tok: Token) -> Result<(), CalcError> {
        let recu = self.piles.arites.pop().ok_or_else(|| {
            CalcError::syntaxe(format!("appel ‘{}’ sans arguments", tok.lexeme), tok.offset)
        })?;
        let f = fonction(&tok.lexeme).ok_or_else(|| CalcError::FonctionIndefinie {
            nom: tok.lexeme.clone(),
            position: tok.offset,
        })?;
        if recu != f.arite {
            return Err(CalcError::Arite {
                nom: tok.lexeme.clone(),
                attendu: f.arite,
                recu,
                position: tok.offset,
            });
        }

        let n = self.piles.operandes.len();
        if n < recu {
            return Err(CalcError::syntaxe(
                format!("arguments manquants pour ‘{}’", tok.lexeme),
                tok.offset,
            ));
        }
        // l’ordre de la pile est l’ordre des arguments
        let args = self
            .piles
            .operandes
            .split_off(n - recu)
            .into_iter()
            .map(|o| self.resoudre(o))
            .collect::<Result<Vec<_>, _>>()?;

        let r = (f.imp)(&args)
            .map_err(|e| CalcError::depuis_numerique(e, &tok.lexeme, tok.offset))?;

        trace!(fonction = %tok.lexeme, resultat = %format_fraction(&r), "appel");
        self.noter(|| {
            let args: Vec<String> = args.iter().map(format_fraction).collect();
            format!("{}({}) → {}", tok.lexeme, args.join(", "), format_fraction(&r))
        });
        self.piles.operandes.push(Operande::Valeur(r));
        Ok(())
    }

    /* ------------------------ Résolution ------------------------ */

    fn resoudre(&self, o: Operande) -> Result<BigRational, CalcError> {
        match o {
            Operande::Valeur(v) => Ok(v),
            Operande::EnAttente(t) => self.chercher(&t),
        }
    }

    fn chercher(&self, t: &Token) -> Result<BigRational, CalcError> {
        let litteral = match t.kind {
            TokenKind::Ident => {
                return self
                    .variables
                    .get(&t.lexeme)
                    .cloned()
                    .ok_or_else(|| CalcError::VariableIndefinie {
                        nom: t.lexeme.clone(),
                        position: t.offset,
                    })
            }
            TokenKind::Decimal => parse_decimal(&t.lexeme),
            TokenKind::Hex => parse_radix(&t.lexeme, 16),
            TokenKind::Binary => parse_radix(&t.lexeme, 2),
            TokenKind::Octal => parse_radix(&t.lexeme, 8),
            _ => {
                return Err(CalcError::syntaxe(
                    format!("jeton inattendu ‘{}’", t.lexeme),
                    t.offset,
                ))
            }
        };
        litteral.ok_or_else(|| CalcError::Lexicale {
            message: format!("nombre invalide ‘{}’", t.lexeme),
            position: t.offset,
        })
    }
}

fn nom_operateur(tok: &Token) -> &str {
    match tok.kind {
        TokenKind::UnaryMin => "neg",
        _ => &tok.lexeme,
    }
}

/* ------------------------ Sémantique des opérateurs ------------------------ */

fn unaire(kind: TokenKind, b: &BigRational) -> Resultat {
    match kind {
        TokenKind::Not => non(b),
        _ => Ok(-b),
    }
}

fn binaire(kind: TokenKind, a: &BigRational, b: &BigRational) -> Resultat {
    use std::cmp::Ordering::*;
    use TokenKind::*;

    match kind {
        Add => Ok(a + b),
        Sub => Ok(a - b),
        Mul => Ok(a * b),
        Div => diviser(a, b),
        Rem => modulo(a, b),
        Pow => puissance(a, b),
        And => et(a, b),
        Or => ou(a, b),
        Xor => ou_exclusif(a, b),
        Lsh => decalage_gauche(a, b),
        Rsh => decalage_droite(a, b),
        EqEq => Ok(depuis_bool(comparer(a, b) == Equal)),
        NotEq => Ok(depuis_bool(comparer(a, b) != Equal)),
        Gt => Ok(depuis_bool(comparer(a, b) == Greater)),
        GtEq => Ok(depuis_bool(comparer(a, b) != Less)),
        Lt => Ok(depuis_bool(comparer(a, b) == Less)),
        LtEq => Ok(depuis_bool(comparer(a, b) != Greater)),
        // affectations : déjà ramenées à leur opérateur de base
        _ => Ok(b.clone()),
    }
}
