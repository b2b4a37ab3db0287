//! 预约可用性计算 / Slot availability
//!
//! Pure functions over one day's appointments. Times are handled as minutes
//! since midnight; every occupied range is half-open `[inicio, fin)`, so a
//! booking ending at 10:00 does not collide with one starting at 10:00.

use chrono::NaiveTime;

use super::models::{CitaAgenda, Conflicto, Disponibilidad};
use crate::comm::time::{format_minutos, minutos};
use crate::modules::configuracion::models::Agenda;

/// 一次检查的输入
#[derive(Debug, Clone, Copy, Default)]
pub struct Solicitud {
    pub hora: Option<NaiveTime>,
    /// 显式指定的时长
    pub duracion: Option<u32>,
    /// 所选服务的时长
    pub duracion_servicio: Option<u32>,
    pub permitir_superposicion: Option<bool>,
    pub excluir_cita_id: Option<i64>,
}

/// 向上取整到间隔的整数倍
pub fn redondear(duracion: u32, intervalo: u32) -> u32 {
    let intervalo = intervalo.max(1);
    duracion
        .max(1)
        .div_ceil(intervalo)
        .saturating_mul(intervalo)
}

#[derive(Debug, Clone, Copy)]
struct Rango {
    inicio: u32,
    fin: u32,
}

impl Rango {
    fn se_superpone(&self, otro: &Rango) -> bool {
        self.inicio < otro.fin && otro.inicio < self.fin
    }
}

fn duracion_positiva(d: Option<i64>) -> Option<u32> {
    d.and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0)
}

fn rango_de(cita: &CitaAgenda, intervalo: u32) -> Rango {
    let dur = duracion_positiva(cita.duracion)
        .or_else(|| duracion_positiva(cita.servicio_duracion))
        .unwrap_or(intervalo);
    let inicio = minutos(cita.hora);
    Rango {
        inicio,
        fin: inicio.saturating_add(redondear(dur, intervalo)),
    }
}

/// 占用时间段的预约（排除取消、爽约与被排除的 id）
fn ocupadas<'a>(
    citas: &'a [CitaAgenda],
    intervalo: u32,
    excluir: Option<i64>,
) -> impl Iterator<Item = (&'a CitaAgenda, Rango)> + 'a {
    citas
        .iter()
        .filter(move |c| c.estado.ocupa_horario() && Some(c.id) != excluir)
        .map(move |c| (c, rango_de(c, intervalo)))
}

/// 从开门时间起按间隔列出能放下 `ocupado` 分钟的空闲起始时间
pub fn horarios_libres(
    agenda: &Agenda,
    citas: &[CitaAgenda],
    ocupado: u32,
    excluir: Option<i64>,
    ignorar_ocupadas: bool,
) -> Vec<u32> {
    let intervalo = agenda.intervalo.max(1);
    let apertura = minutos(agenda.apertura);
    let cierre = minutos(agenda.cierre);
    let tomadas: Vec<Rango> = if ignorar_ocupadas {
        Vec::new()
    } else {
        ocupadas(citas, intervalo, excluir).map(|(_, r)| r).collect()
    };

    let mut libres = Vec::new();
    let mut t = apertura;
    while t.saturating_add(ocupado) <= cierre {
        let candidato = Rango {
            inicio: t,
            fin: t.saturating_add(ocupado),
        };
        if !tomadas.iter().any(|r| r.se_superpone(&candidato)) {
            libres.push(t);
        }
        t = t.saturating_add(intervalo);
    }
    libres
}

/// 计算候选时间段的可用性
pub fn calcular(agenda: &Agenda, solicitud: &Solicitud, citas: &[CitaAgenda]) -> Disponibilidad {
    let intervalo = agenda.intervalo.max(1);
    let duracion_servicio = solicitud
        .duracion
        .filter(|d| *d > 0)
        .or(solicitud.duracion_servicio.filter(|d| *d > 0))
        .unwrap_or(intervalo);
    let ocupado = redondear(duracion_servicio, intervalo);
    let permitir = solicitud
        .permitir_superposicion
        .unwrap_or(agenda.permitir_superposicion);

    let inicio = solicitud.hora.map(minutos).unwrap_or_else(|| minutos(agenda.apertura));
    let candidato = Rango {
        inicio,
        fin: inicio.saturating_add(ocupado),
    };
    let dentro_de_horario =
        candidato.inicio >= minutos(agenda.apertura) && candidato.fin <= minutos(agenda.cierre);

    let solapes: Vec<Conflicto> = ocupadas(citas, intervalo, solicitud.excluir_cita_id)
        .filter(|(_, r)| r.se_superpone(&candidato))
        .map(|(c, r)| Conflicto {
            cita_id: c.id,
            hora: format_minutos(r.inicio),
            hora_fin: format_minutos(r.fin),
            cliente_nombre: c.cliente_nombre.clone(),
            servicio_nombre: c.servicio_nombre.clone(),
        })
        .collect();
    let (conflictos, superposiciones) = if permitir {
        (Vec::new(), solapes)
    } else {
        (solapes, Vec::new())
    };

    let disponible = dentro_de_horario && conflictos.is_empty();

    let sugerencias = if disponible {
        Vec::new()
    } else {
        let mut libres =
            horarios_libres(agenda, citas, ocupado, solicitud.excluir_cita_id, permitir);
        libres.retain(|t| *t != inicio);
        libres.sort_by_key(|t| (t.abs_diff(inicio), *t));
        libres
            .into_iter()
            .take(agenda.max_sugerencias)
            .map(format_minutos)
            .collect()
    };

    Disponibilidad {
        disponible,
        dentro_de_horario,
        conflictos,
        superposiciones,
        sugerencias,
        duracion_servicio,
        intervalo_configurado: intervalo,
        tiempo_total_ocupado: ocupado,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::cita::models::EstadoCita;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn agenda() -> Agenda {
        Agenda {
            intervalo: 30,
            apertura: hm(9, 0),
            cierre: hm(18, 0),
            permitir_superposicion: false,
            max_sugerencias: 5,
        }
    }

    fn cita(id: i64, hora: NaiveTime, duracion: Option<i64>, estado: EstadoCita) -> CitaAgenda {
        CitaAgenda {
            id,
            hora,
            duracion,
            servicio_duracion: Some(30),
            estado,
            cliente_nombre: format!("Cliente {}", id),
            servicio_nombre: Some("Corte".to_string()),
        }
    }

    fn pedir(hora: NaiveTime, duracion: Option<u32>) -> Solicitud {
        Solicitud {
            hora: Some(hora),
            duracion,
            ..Default::default()
        }
    }

    #[test]
    fn rounds_up_to_interval() {
        assert_eq!(redondear(45, 30), 60);
        assert_eq!(redondear(60, 30), 60);
        assert_eq!(redondear(1, 15), 15);
        assert_eq!(redondear(10, 0), 10);
    }

    #[test]
    fn huge_duration_saturates_and_is_outside_hours() {
        assert_eq!(redondear(u32::MAX, 30), u32::MAX);
        let d = calcular(&agenda(), &pedir(hm(10, 0), Some(u32::MAX)), &[]);
        assert!(!d.disponible);
        assert!(!d.dentro_de_horario);
        assert!(d.sugerencias.is_empty());

        let citas = [cita(1, hm(9, 0), Some(i64::from(u32::MAX)), EstadoCita::Confirmada)];
        let d = calcular(&agenda(), &pedir(hm(17, 0), Some(30)), &citas);
        assert_eq!(d.conflictos.len(), 1);
    }

    #[test]
    fn empty_day_is_available() {
        let d = calcular(&agenda(), &pedir(hm(10, 0), Some(45)), &[]);
        assert!(d.disponible);
        assert!(d.dentro_de_horario);
        assert_eq!(d.duracion_servicio, 45);
        assert_eq!(d.tiempo_total_ocupado, 60);
        assert_eq!(d.intervalo_configurado, 30);
        assert!(d.sugerencias.is_empty());
    }

    #[test]
    fn back_to_back_bookings_do_not_overlap() {
        let citas = [cita(1, hm(10, 0), Some(30), EstadoCita::Confirmada)];
        assert!(calcular(&agenda(), &pedir(hm(10, 30), None), &citas).disponible);
        assert!(calcular(&agenda(), &pedir(hm(9, 30), None), &citas).disponible);
    }

    #[test]
    fn overlap_is_a_conflict_with_details() {
        // 45 分钟的预约按 60 分钟占用
        let citas = [cita(7, hm(10, 0), Some(45), EstadoCita::Pendiente)];
        let d = calcular(&agenda(), &pedir(hm(10, 30), Some(30)), &citas);
        assert!(!d.disponible);
        assert_eq!(d.conflictos.len(), 1);
        let c = &d.conflictos[0];
        assert_eq!(c.cita_id, 7);
        assert_eq!(c.hora, "10:00");
        assert_eq!(c.hora_fin, "11:00");
        assert_eq!(c.cliente_nombre, "Cliente 7");
        assert!(d.superposiciones.is_empty());
    }

    #[test]
    fn cancelled_and_excluded_citas_are_ignored() {
        let citas = [
            cita(1, hm(10, 0), None, EstadoCita::Cancelada),
            cita(2, hm(10, 0), None, EstadoCita::NoAsistio),
            cita(3, hm(10, 0), None, EstadoCita::Confirmada),
        ];
        let mut s = pedir(hm(10, 0), None);
        assert!(!calcular(&agenda(), &s, &citas).disponible);
        s.excluir_cita_id = Some(3);
        assert!(calcular(&agenda(), &s, &citas).disponible);
    }

    #[test]
    fn duration_falls_back_to_service_then_interval() {
        let mut s = pedir(hm(10, 0), None);
        s.duracion_servicio = Some(50);
        let d = calcular(&agenda(), &s, &[]);
        assert_eq!(d.duracion_servicio, 50);
        assert_eq!(d.tiempo_total_ocupado, 60);

        let d = calcular(&agenda(), &pedir(hm(10, 0), None), &[]);
        assert_eq!(d.duracion_servicio, 30);
        assert_eq!(d.tiempo_total_ocupado, 30);
    }

    #[test]
    fn outside_business_hours() {
        let d = calcular(&agenda(), &pedir(hm(17, 30), Some(60)), &[]);
        assert!(!d.dentro_de_horario);
        assert!(!d.disponible);
        assert_eq!(d.sugerencias.first().map(String::as_str), Some("17:00"));

        let d = calcular(&agenda(), &pedir(hm(8, 30), None), &[]);
        assert!(!d.dentro_de_horario);
        assert_eq!(d.sugerencias.first().map(String::as_str), Some("09:00"));
    }

    #[test]
    fn overlap_allowed_reports_superposiciones() {
        let citas = [cita(4, hm(11, 0), Some(60), EstadoCita::Confirmada)];
        let mut s = pedir(hm(11, 30), None);
        s.permitir_superposicion = Some(true);
        let d = calcular(&agenda(), &s, &citas);
        assert!(d.disponible);
        assert!(d.conflictos.is_empty());
        assert_eq!(d.superposiciones.len(), 1);

        let mut permisiva = agenda();
        permisiva.permitir_superposicion = true;
        let d = calcular(&permisiva, &pedir(hm(11, 30), None), &citas);
        assert!(d.disponible);
        assert_eq!(d.superposiciones[0].cita_id, 4);
    }

    #[test]
    fn suggestions_are_nearest_free_slots() {
        let citas = [
            cita(1, hm(10, 0), Some(60), EstadoCita::Confirmada),
            cita(2, hm(11, 0), Some(30), EstadoCita::Confirmada),
        ];
        let d = calcular(&agenda(), &pedir(hm(10, 30), Some(30)), &citas);
        assert!(!d.disponible);
        // 09:30 与 11:30 距离相同，较早者优先
        assert_eq!(d.sugerencias, vec!["09:30", "11:30", "09:00", "12:00", "12:30"]);
    }

    #[test]
    fn suggestions_respect_closing_time_and_limit() {
        let mut a = agenda();
        a.max_sugerencias = 2;
        let citas = [cita(1, hm(17, 0), Some(60), EstadoCita::Pendiente)];
        let d = calcular(&a, &pedir(hm(17, 0), Some(60)), &citas);
        assert_eq!(d.sugerencias, vec!["16:00", "15:30"]);
    }

    #[test]
    fn free_slots_for_a_day() {
        let mut a = agenda();
        a.apertura = hm(9, 0);
        a.cierre = hm(11, 0);
        let citas = [cita(1, hm(9, 30), Some(30), EstadoCita::Pendiente)];
        let libres = horarios_libres(&a, &citas, 30, None, false);
        assert_eq!(libres, vec![540, 600, 630]);
    }
}
