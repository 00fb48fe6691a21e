use std::fmt;

/// Marca de emisión de una petición asíncrona.
///
/// Solo sirve para comparar frescura: un token mayor fue emitido después.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
  pub fn get(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for RequestToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Guarda contra respuestas obsoletas.
///
/// Mantiene el último valor aplicado y solo deja que lo reemplace un
/// resultado cuyo token sea mayor o igual que el último aceptado. El orden
/// de emisión manda, no el de finalización: el llamador debe pedir el token
/// con [`StaleGuard::issue`] antes de lanzar la operación asíncrona.
///
/// Los empates se aceptan. Un flujo puede limpiar la vista con un token y
/// después poblarla con el mismo token cuando llega la respuesta.
#[derive(Debug, Clone)]
pub struct StaleGuard<T> {
  issued: u64,
  accepted: Option<RequestToken>,
  value: T,
}

impl<T> StaleGuard<T> {
  pub fn new(initial: T) -> Self {
    Self { issued: 0, accepted: None, value: initial }
  }

  /// Emite un token mayor que todos los anteriores.
  pub fn issue(&mut self) -> RequestToken {
    self.issued += 1;
    RequestToken(self.issued)
  }

  /// Aplica `value` si `token` no es más viejo que el último aceptado.
  ///
  /// El rechazo es silencioso: es el resultado normal de una petición superada.
  pub fn try_apply(&mut self, token: RequestToken, value: T) -> bool {
    self.try_update(token, |_| (value, ())).is_some()
  }

  /// Como [`StaleGuard::try_apply`], pero el nuevo valor se calcula a partir
  /// del valor actual. `f` solo se ejecuta si el token es aceptado.
  pub fn try_update<R>(&mut self, token: RequestToken, f: impl FnOnce(&T) -> (T, R)) -> Option<R> {
    if !self.accepts(token) {
      tracing::debug!(%token, accepted = ?self.accepted, "discarding stale result");
      return None;
    }
    let (next, out) = f(&self.value);
    self.value = next;
    self.accepted = Some(token);
    Some(out)
  }

  pub fn accepts(&self, token: RequestToken) -> bool {
    self.accepted.is_none_or(|mark| token >= mark)
  }

  /// `true` si no se ha emitido ningún token después de `token`.
  pub fn is_latest(&self, token: RequestToken) -> bool {
    token.0 == self.issued
  }

  pub fn current(&self) -> &T {
    &self.value
  }

  /// Marca de agua: último token aceptado.
  pub fn accepted(&self) -> Option<RequestToken> {
    self.accepted
  }

  /// `true` si el valor vigente lo aplicó `token`. Es la condición para
  /// publicar ese valor: un resultado ya superado no debe llegar a la vista.
  pub fn is_current(&self, token: RequestToken) -> bool {
    self.accepted == Some(token)
  }
}

impl<T: Default> Default for StaleGuard<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
